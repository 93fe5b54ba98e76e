//! Error types for conversion strategies.

use std::path::PathBuf;
use thiserror::Error;

/// Errors a conversion strategy can report for one attempt.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The external converter tool was not found.
    #[error("converter tool not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The strategy ran but did not produce a usable output.
    #[error("conversion failed: {reason}")]
    Failed {
        reason: String,
        stderr: Option<String>,
    },

    /// I/O error while running the strategy.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StrategyError {
    /// Creates a new failure with optional captured stderr output.
    pub fn failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            stderr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StrategyError::ToolNotFound {
            path: PathBuf::from("/usr/bin/soffice"),
        };
        assert_eq!(
            err.to_string(),
            "converter tool not found at path: /usr/bin/soffice"
        );

        let err = StrategyError::failed("exited with status 1", None);
        assert_eq!(err.to_string(), "conversion failed: exited with status 1");
    }
}
