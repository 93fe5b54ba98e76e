//! Zip archive packager with optional AES encryption.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zip::write::{ExtendedFileOptions, FileOptions, ZipWriter};
use zip::{AesMode, CompressionMethod};

use super::config::{Compression, PackagerConfig};
use super::error::PackagerError;
use super::traits::Packager;
use super::types::PackageSummary;
use crate::orchestrator::CancelFlag;
use crate::progress::{ProgressEvent, ProgressHandle};

/// Progress percentage at which packaging begins; the remaining span up to
/// 100 is divided across entries.
const PACKAGING_PROGRESS_START: u8 = 85;
const PACKAGING_PROGRESS_SPAN: u8 = 15;

/// Packager writing one zip archive, AES-encrypted when a password is set.
pub struct ZipPackager {
    config: PackagerConfig,
}

impl ZipPackager {
    /// Creates a packager with the given configuration.
    pub fn new(config: PackagerConfig) -> Self {
        Self { config }
    }

    /// Creates a packager with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PackagerConfig::default())
    }

    fn compression_method(&self) -> CompressionMethod {
        match self.config.compression {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        }
    }
}

#[async_trait]
impl Packager for ZipPackager {
    fn name(&self) -> &str {
        "zip"
    }

    async fn package(
        &self,
        files: &[PathBuf],
        archive_path: &Path,
        password: Option<&str>,
        cancel: &CancelFlag,
        progress: Option<&ProgressHandle>,
    ) -> Result<PackageSummary, PackagerError> {
        if files.is_empty() {
            return Err(PackagerError::NoFiles);
        }
        for path in files {
            match tokio::fs::metadata(path).await {
                Ok(meta) if meta.is_file() && meta.len() > 0 => {}
                _ => {
                    return Err(PackagerError::SourceMissing { path: path.clone() });
                }
            }
        }

        let files = files.to_vec();
        let archive = archive_path.to_path_buf();
        let password = password.map(|p| p.to_string());
        let method = self.compression_method();
        let aes_mode = self.config.encryption.aes_mode();
        let cancel = cancel.clone();
        let progress = progress.cloned();

        let archive_for_task = archive.clone();
        let result = tokio::task::spawn_blocking(move || {
            write_archive(
                &files,
                &archive_for_task,
                password.as_deref(),
                method,
                aes_mode,
                &cancel,
                progress.as_ref(),
            )
        })
        .await
        .map_err(|e| PackagerError::TaskFailed(e.to_string()))?;

        match result {
            Ok(entries) => {
                let archive_bytes = tokio::fs::metadata(&archive)
                    .await
                    .map(|m| m.len())
                    .unwrap_or(0);
                info!(
                    "wrote archive {} ({} entries, {} bytes)",
                    archive.display(),
                    entries,
                    archive_bytes
                );
                Ok(PackageSummary {
                    archive_path: archive,
                    entries,
                    archive_bytes,
                })
            }
            Err(e) => {
                // Never leave a partial archive behind.
                if tokio::fs::remove_file(&archive).await.is_err() {
                    warn!("could not remove partial archive {}", archive.display());
                }
                Err(e)
            }
        }
    }
}

/// Writes the archive synchronously; runs on the blocking pool.
fn write_archive(
    files: &[PathBuf],
    archive_path: &Path,
    password: Option<&str>,
    method: CompressionMethod,
    aes_mode: AesMode,
    cancel: &CancelFlag,
    progress: Option<&ProgressHandle>,
) -> Result<usize, PackagerError> {
    let file = std::fs::File::create(archive_path)?;
    let mut writer = ZipWriter::new(file);
    let total = files.len();

    for (idx, path) in files.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(PackagerError::Cancelled);
        }

        let entry_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("entry_{}", idx));

        if let Some(pwd) = password {
            let options: FileOptions<ExtendedFileOptions> = FileOptions::default()
                .compression_method(method)
                .with_aes_encryption(aes_mode, pwd);
            writer.start_file(entry_name, options)?;
        } else {
            let options: FileOptions<()> = FileOptions::default().compression_method(method);
            writer.start_file(entry_name, options)?;
        }

        let data = std::fs::read(path)?;
        writer.write_all(&data)?;

        if let Some(handle) = progress {
            let percent = PACKAGING_PROGRESS_START
                + ((idx + 1) * PACKAGING_PROGRESS_SPAN as usize / total) as u8;
            handle.try_emit(ProgressEvent::Progress { percent });
        }
    }

    writer.finish()?;
    Ok(total)
}
