//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Terminal status of a single file conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// The output file was produced and validated.
    Success,
    /// All attempts were exhausted, or a precondition failed.
    Failed,
    /// The conversion was skipped because the batch was cancelled.
    Cancelled,
}

/// The per-file result record, produced exactly once per input file.
///
/// Invariant: `status == Success` exactly when `output_path` is set and
/// `error` is unset. The constructors below are the only way to build an
/// outcome, so the invariant holds by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Source file this outcome describes.
    pub input_path: PathBuf,
    /// Produced file, present only on success.
    pub output_path: Option<PathBuf>,
    /// Terminal status.
    pub status: ConversionStatus,
    /// Conversion attempts made. Zero only for precondition failures
    /// (missing input, missing output directory) and cancellations.
    pub attempts: u32,
    /// Human-readable cause, present only when the conversion did not succeed.
    pub error: Option<String>,
}

impl ConversionOutcome {
    /// Builds a successful outcome.
    pub fn success(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        attempts: u32,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: Some(output_path.into()),
            status: ConversionStatus::Success,
            attempts,
            error: None,
        }
    }

    /// Builds a failed outcome.
    pub fn failed(input_path: impl Into<PathBuf>, attempts: u32, error: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            status: ConversionStatus::Failed,
            attempts,
            error: Some(error.into()),
        }
    }

    /// Builds a cancelled outcome for a conversion that never started.
    pub fn cancelled(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            status: ConversionStatus::Cancelled,
            attempts: 0,
            error: Some("conversion cancelled before it started".to_string()),
        }
    }

    /// Whether this outcome represents a successful conversion.
    pub fn is_success(&self) -> bool {
        self.status == ConversionStatus::Success
    }

    /// Base name of the input file, used as the identifier in reports.
    pub fn file_name(&self) -> String {
        file_display_name(&self.input_path)
    }
}

/// Base name of a path, falling back to the full path when it has none.
pub(crate) fn file_display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
