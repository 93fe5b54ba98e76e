//! Event types for the progress channel.

use std::path::PathBuf;

/// Severity attached to a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Payload of the terminal `Finished` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishedPayload {
    /// The archive that was produced.
    Archive(PathBuf),
    /// The run was cancelled by the user; not an application error.
    Cancelled,
    /// The run failed with the given message.
    Error(String),
}

/// An event emitted during a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A human-readable status line.
    Status { message: String, severity: Severity },
    /// Overall progress, 0-100. The conversion phase maps to 0-80;
    /// packaging fills 85-100.
    Progress { percent: u8 },
    /// Completed-conversion counter.
    Active { completed: usize, total: usize },
    /// Terminal event, emitted exactly once per run.
    Finished {
        success: bool,
        payload: FinishedPayload,
    },
}

impl ProgressEvent {
    /// Convenience constructor for status lines.
    pub fn status(message: impl Into<String>, severity: Severity) -> Self {
        Self::Status {
            message: message.into(),
            severity,
        }
    }
}
