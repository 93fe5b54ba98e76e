//! Mock packager for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::orchestrator::CancelFlag;
use crate::packager::{PackageSummary, Packager, PackagerError};
use crate::progress::ProgressHandle;

/// A recorded packaging call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedPackage {
    pub files: Vec<PathBuf>,
    pub archive_path: PathBuf,
    pub password: Option<String>,
}

/// Mock implementation of the `Packager` trait.
///
/// Records every call and writes a stub archive file so callers that stat
/// the result keep working. An error can be injected for the next call.
/// Clones share state, so a test can keep a handle to a packager it moved
/// into an orchestrator.
#[derive(Clone)]
pub struct MockPackager {
    packages: Arc<Mutex<Vec<RecordedPackage>>>,
    next_error: Arc<Mutex<Option<PackagerError>>>,
}

impl Default for MockPackager {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPackager {
    /// Creates a new mock packager.
    pub fn new() -> Self {
        Self {
            packages: Arc::new(Mutex::new(Vec::new())),
            next_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Configures the next `package` call to fail with the given error.
    pub async fn set_next_error(&self, error: PackagerError) {
        *self.next_error.lock().await = Some(error);
    }

    /// All recorded packaging calls.
    pub async fn recorded_packages(&self) -> Vec<RecordedPackage> {
        self.packages.lock().await.clone()
    }

    /// Number of packaging calls made.
    pub async fn package_count(&self) -> usize {
        self.packages.lock().await.len()
    }
}

#[async_trait]
impl Packager for MockPackager {
    fn name(&self) -> &str {
        "mock"
    }

    async fn package(
        &self,
        files: &[PathBuf],
        archive_path: &Path,
        password: Option<&str>,
        cancel: &CancelFlag,
        _progress: Option<&ProgressHandle>,
    ) -> Result<PackageSummary, PackagerError> {
        if let Some(error) = self.next_error.lock().await.take() {
            return Err(error);
        }
        if files.is_empty() {
            return Err(PackagerError::NoFiles);
        }
        if cancel.is_cancelled() {
            return Err(PackagerError::Cancelled);
        }

        self.packages.lock().await.push(RecordedPackage {
            files: files.to_vec(),
            archive_path: archive_path.to_path_buf(),
            password: password.map(|p| p.to_string()),
        });

        let stub = b"mock archive";
        tokio::fs::write(archive_path, stub).await?;
        Ok(PackageSummary {
            archive_path: archive_path.to_path_buf(),
            entries: files.len(),
            archive_bytes: stub.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_and_writes_stub() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("out.zip");
        let packager = MockPackager::new();

        let summary = packager
            .package(
                &[PathBuf::from("/tmp/a.pdf")],
                &archive,
                Some("pw"),
                &CancelFlag::new(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(summary.entries, 1);
        assert!(archive.exists());

        let recorded = packager.recorded_packages().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].password.as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn test_error_injection() {
        let dir = tempfile::tempdir().unwrap();
        let packager = MockPackager::new();
        packager.set_next_error(PackagerError::NoFiles).await;

        let result = packager
            .package(
                &[PathBuf::from("/tmp/a.pdf")],
                &dir.path().join("out.zip"),
                None,
                &CancelFlag::new(),
                None,
            )
            .await;
        assert!(result.is_err());
        assert_eq!(packager.package_count().await, 0);
    }
}
