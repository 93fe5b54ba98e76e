//! Trait definitions for the packager module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::PackagerError;
use super::types::PackageSummary;
use crate::orchestrator::CancelFlag;
use crate::progress::ProgressHandle;

/// Bundles a list of files into a single (optionally encrypted) archive.
#[async_trait]
pub trait Packager: Send + Sync {
    /// Returns the name of this packager implementation.
    fn name(&self) -> &str;

    /// Writes one archive at `archive_path` with one entry per file.
    ///
    /// The caller guarantees a non-empty list of existing, non-empty files.
    /// The cancel flag is honored between entries; a cancelled or failed
    /// package leaves no partial archive behind.
    async fn package(
        &self,
        files: &[PathBuf],
        archive_path: &Path,
        password: Option<&str>,
        cancel: &CancelFlag,
        progress: Option<&ProgressHandle>,
    ) -> Result<PackageSummary, PackagerError>;
}
