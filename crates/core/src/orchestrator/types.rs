//! Types for the batch orchestrator.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::packager::{PackageSummary, PackagerError};
use crate::report::ConversionReport;

/// Cooperative cancellation flag shared across all tasks of one batch run.
///
/// Cancellation is observed, never preemptive: a conversion already past
/// its check runs to its own completion or timeout.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Errors that can abort a batch run.
///
/// Per-file failures never abort the batch; they are recorded in the report.
/// The variants carrying a report are terminal states of a run that already
/// started, so the partial statistics stay available to the caller.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The parallelism limit is out of range.
    #[error("parallel conversions must be between 1 and {max}, got {got}")]
    InvalidParallelism { got: usize, max: usize },

    /// The input list is empty.
    #[error("no input files provided")]
    EmptyBatch,

    /// Two inputs would produce the same output file name.
    #[error("duplicate input file name: {stem}")]
    DuplicateStem { stem: String },

    /// I/O error while preparing the run.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The run was cancelled by the user. Not an application error.
    #[error("conversion cancelled")]
    Cancelled { report: ConversionReport },

    /// Every file in the batch failed to convert.
    #[error("no files were converted")]
    NoFilesConverted { report: ConversionReport },

    /// Conversion succeeded but the archive could not be written.
    #[error("packaging failed: {source}")]
    Packaging {
        source: PackagerError,
        report: ConversionReport,
    },
}

impl OrchestratorError {
    /// The report of the aborted run, when one was started.
    pub fn report(&self) -> Option<&ConversionReport> {
        match self {
            Self::Cancelled { report }
            | Self::NoFilesConverted { report }
            | Self::Packaging { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Whether this is a user cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Result of a completed batch run.
#[derive(Debug)]
pub struct BatchOutput {
    /// Produced output files, in completion order. These lived in the
    /// per-run scratch directory; the archive is the durable artifact.
    pub outputs: Vec<PathBuf>,
    /// The archive the packager wrote.
    pub archive: PackageSummary,
    /// Finalized batch statistics.
    pub report: ConversionReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_shared_across_clones() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());
        flag.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::InvalidParallelism { got: 32, max: 16 };
        assert_eq!(
            err.to_string(),
            "parallel conversions must be between 1 and 16, got 32"
        );

        let err = OrchestratorError::DuplicateStem {
            stem: "report".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate input file name: report");
    }

    #[test]
    fn test_cancelled_is_not_a_failure() {
        let err = OrchestratorError::Cancelled {
            report: ConversionReport::new(3),
        };
        assert!(err.is_cancelled());
        assert!(err.report().is_some());

        let err = OrchestratorError::EmptyBatch;
        assert!(!err.is_cancelled());
        assert!(err.report().is_none());
    }
}
