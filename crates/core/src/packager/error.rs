//! Error types for the packager module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building an archive.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The caller passed an empty file list.
    #[error("no files to package")]
    NoFiles,

    /// A source file is missing or empty.
    #[error("source file missing or empty: {path}")]
    SourceMissing { path: PathBuf },

    /// Packaging was cancelled by the user.
    #[error("packaging cancelled")]
    Cancelled,

    /// Archive format error.
    #[error("archive error: {0}")]
    Zip(#[from] ::zip::result::ZipError),

    /// I/O error while reading sources or writing the archive.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking archive task died.
    #[error("archive task failed: {0}")]
    TaskFailed(String),
}
