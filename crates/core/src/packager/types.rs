//! Types for the packager module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of a successful packaging step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSummary {
    /// Path of the produced archive.
    pub archive_path: PathBuf,
    /// Number of entries written.
    pub entries: usize,
    /// Size of the archive in bytes.
    pub archive_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serialization() {
        let summary = PackageSummary {
            archive_path: PathBuf::from("/out/documents.zip"),
            entries: 3,
            archive_bytes: 4096,
        };
        let json = serde_json::to_string(&summary).unwrap();
        let parsed: PackageSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.entries, 3);
        assert_eq!(parsed.archive_bytes, 4096);
    }
}
