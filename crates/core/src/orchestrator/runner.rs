//! Batch orchestrator implementation.
//!
//! One tokio task per input file, bounded by a semaphore sized to the
//! configured parallelism. Outcomes flow through a channel into a single
//! collection loop, which is the only writer of the report, so no lock
//! guards the report's lists.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::converter::{ConversionOutcome, ConversionStatus, DocumentConverter};
use crate::packager::{PackageSummary, Packager, PackagerError};
use crate::progress::{FinishedPayload, ProgressEvent, ProgressHandle, Severity};
use crate::report::ConversionReport;

use super::config::{OrchestratorConfig, MAX_PARALLEL_ALLOWED};
use super::monitor::{NoopMonitor, ResourceMonitor};
use super::types::{BatchOutput, CancelFlag, OrchestratorError};

/// Share of the progress bar covered by the conversion phase; packaging
/// fills the rest.
const CONVERSION_PROGRESS_SPAN: f64 = 80.0;

/// How a run ended, before the report is attached.
enum RunFailure {
    Cancelled,
    NoOutputs,
    Packaging(PackagerError),
}

/// Drives a batch of files through conversion and packaging.
pub struct BatchOrchestrator<C, P>
where
    C: DocumentConverter + 'static,
    P: Packager + 'static,
{
    config: OrchestratorConfig,
    converter: Arc<C>,
    packager: Arc<P>,
    monitor: Arc<dyn ResourceMonitor>,
    progress: Option<ProgressHandle>,
}

impl<C, P> BatchOrchestrator<C, P>
where
    C: DocumentConverter + 'static,
    P: Packager + 'static,
{
    /// Creates a new orchestrator.
    pub fn new(config: OrchestratorConfig, converter: C, packager: P) -> Self {
        Self {
            config,
            converter: Arc::new(converter),
            packager: Arc::new(packager),
            monitor: Arc::new(NoopMonitor),
            progress: None,
        }
    }

    /// Sets the progress handle events are emitted through.
    pub fn with_progress(mut self, progress: ProgressHandle) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sets the resource monitor used for housekeeping hints.
    pub fn with_monitor(mut self, monitor: Arc<dyn ResourceMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Runs the whole batch: validate, convert in parallel, package.
    ///
    /// Per-file failures are recorded in the report and never abort the
    /// batch. The run itself fails only on invalid arguments, cancellation,
    /// zero successes, or a packaging error; the report is finalized and
    /// the scratch directory removed on every path out of this function.
    pub async fn run(
        &self,
        inputs: &[PathBuf],
        archive_path: &Path,
        password: Option<&str>,
        cancel: CancelFlag,
    ) -> Result<BatchOutput, OrchestratorError> {
        let limit = self.config.max_parallel;
        if limit < 1 || limit > MAX_PARALLEL_ALLOWED {
            return Err(OrchestratorError::InvalidParallelism {
                got: limit,
                max: MAX_PARALLEL_ALLOWED,
            });
        }
        if inputs.is_empty() {
            return Err(OrchestratorError::EmptyBatch);
        }
        // Output names are derived from input stems inside one shared
        // scratch directory, so stems must be unique up front.
        let mut stems = HashSet::new();
        for input in inputs {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| input.display().to_string());
            if !stems.insert(stem.clone()) {
                return Err(OrchestratorError::DuplicateStem { stem });
            }
        }

        let scratch = self.config.temp_root.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&scratch).await?;
        info!(
            "starting batch of {} file(s), {} parallel, scratch {}",
            inputs.len(),
            limit,
            scratch.display()
        );

        let mut report = ConversionReport::new(inputs.len());
        let result = self
            .run_inner(inputs, &scratch, archive_path, password, &cancel, &mut report)
            .await;

        if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
            warn!(
                "could not remove scratch directory {}: {}",
                scratch.display(),
                e
            );
        }
        report.finish();

        match result {
            Ok((outputs, archive)) => {
                self.emit(ProgressEvent::Progress { percent: 100 }).await;
                self.emit_status(
                    format!("archive written to {}", archive.archive_path.display()),
                    Severity::Success,
                )
                .await;
                self.emit(ProgressEvent::Finished {
                    success: true,
                    payload: FinishedPayload::Archive(archive.archive_path.clone()),
                })
                .await;
                Ok(BatchOutput {
                    outputs,
                    archive,
                    report,
                })
            }
            Err(RunFailure::Cancelled) => {
                info!("batch cancelled by user");
                self.emit_status("conversion cancelled", Severity::Warning)
                    .await;
                self.emit(ProgressEvent::Finished {
                    success: false,
                    payload: FinishedPayload::Cancelled,
                })
                .await;
                Err(OrchestratorError::Cancelled { report })
            }
            Err(RunFailure::NoOutputs) => {
                self.emit_status("no files were converted", Severity::Error)
                    .await;
                self.emit(ProgressEvent::Finished {
                    success: false,
                    payload: FinishedPayload::Error("no files were converted".to_string()),
                })
                .await;
                Err(OrchestratorError::NoFilesConverted { report })
            }
            Err(RunFailure::Packaging(source)) => {
                self.emit_status(format!("packaging failed: {}", source), Severity::Error)
                    .await;
                self.emit(ProgressEvent::Finished {
                    success: false,
                    payload: FinishedPayload::Error(source.to_string()),
                })
                .await;
                Err(OrchestratorError::Packaging { source, report })
            }
        }
    }

    async fn run_inner(
        &self,
        inputs: &[PathBuf],
        scratch: &Path,
        archive_path: &Path,
        password: Option<&str>,
        cancel: &CancelFlag,
        report: &mut ConversionReport,
    ) -> Result<(Vec<PathBuf>, PackageSummary), RunFailure> {
        let total = inputs.len();
        self.emit_status(
            format!(
                "converting {} file(s) with {} parallel worker(s)",
                total, self.config.max_parallel
            ),
            Severity::Info,
        )
        .await;

        let semaphore = Arc::new(Semaphore::new(self.config.max_parallel));
        let (tx, mut rx) = mpsc::channel::<ConversionOutcome>(total);

        for input in inputs {
            let semaphore = Arc::clone(&semaphore);
            let converter = Arc::clone(&self.converter);
            let cancel = cancel.clone();
            let tx = tx.clone();
            let input = input.clone();
            let scratch = scratch.to_path_buf();

            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                // Tasks still waiting on a permit when cancellation lands
                // are skipped without converting.
                let outcome = if cancel.is_cancelled() {
                    ConversionOutcome::cancelled(&input)
                } else {
                    converter.convert(&input, &scratch).await
                };
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let housekeeping_interval = self.config.housekeeping_interval.max(1);
        let mut outputs: Vec<PathBuf> = Vec::new();
        let mut completed = 0usize;
        let mut cancelled = false;

        while let Some(outcome) = rx.recv().await {
            // Stop recording once cancellation is observed; in-flight tasks
            // drain below so the scratch directory is not pulled out from
            // under them.
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let name = outcome.file_name();
            match outcome.status {
                // A task that observed cancellation before starting; nothing
                // to record.
                ConversionStatus::Cancelled => continue,
                ConversionStatus::Success => {
                    report.record_success(&name);
                    if outcome.attempts > 1 {
                        report.record_retry(&name, outcome.attempts);
                    }
                    if let Some(path) = &outcome.output_path {
                        outputs.push(path.clone());
                    }
                    let detail = if outcome.attempts > 1 {
                        format!("converted {} ({} attempts)", name, outcome.attempts)
                    } else {
                        format!("converted {}", name)
                    };
                    self.emit_status(detail, Severity::Success).await;
                }
                ConversionStatus::Failed => {
                    let error = outcome
                        .error
                        .clone()
                        .unwrap_or_else(|| "unknown error".to_string());
                    self.emit_status(format!("failed to convert {}: {}", name, error), Severity::Error)
                        .await;
                    report.record_failure(&name, &error);
                }
            }

            completed += 1;
            self.emit(ProgressEvent::Active { completed, total }).await;
            let percent = (completed as f64 / total as f64 * CONVERSION_PROGRESS_SPAN) as u8;
            self.emit(ProgressEvent::Progress { percent }).await;

            if completed % housekeeping_interval == 0 || self.memory_pressure() {
                debug!("requesting resource reclamation after {} completion(s)", completed);
                self.monitor.reclaim();
            }
        }

        if cancelled || cancel.is_cancelled() {
            while rx.recv().await.is_some() {}
            return Err(RunFailure::Cancelled);
        }

        if outputs.is_empty() {
            return Err(RunFailure::NoOutputs);
        }

        self.emit_status(
            format!("packaging {} file(s) into archive", outputs.len()),
            Severity::Info,
        )
        .await;
        self.emit(ProgressEvent::Progress { percent: 85 }).await;

        match self
            .packager
            .package(&outputs, archive_path, password, cancel, self.progress.as_ref())
            .await
        {
            Ok(summary) => Ok((outputs, summary)),
            Err(PackagerError::Cancelled) => Err(RunFailure::Cancelled),
            Err(e) => Err(RunFailure::Packaging(e)),
        }
    }

    fn memory_pressure(&self) -> bool {
        self.monitor
            .resident_memory_mb()
            .is_some_and(|mb| mb > self.config.memory_threshold_mb)
    }

    async fn emit(&self, event: ProgressEvent) {
        if let Some(handle) = &self.progress {
            handle.emit(event).await;
        }
    }

    async fn emit_status(&self, message: impl Into<String>, severity: Severity) {
        if let Some(handle) = &self.progress {
            handle.status(message, severity).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ConverterConfig, RetryingConverter};
    use crate::testing::{MockPackager, MockStrategy};

    fn orchestrator_with_limit(
        limit: usize,
        temp_root: PathBuf,
    ) -> BatchOrchestrator<RetryingConverter, MockPackager> {
        let converter = RetryingConverter::new(ConverterConfig::default().with_backoff_unit(0))
            .with_primary(Arc::new(MockStrategy::always_succeeding()));
        BatchOrchestrator::new(
            OrchestratorConfig::default()
                .with_max_parallel(limit)
                .with_temp_root(temp_root),
            converter,
            MockPackager::new(),
        )
    }

    #[tokio::test]
    async fn test_rejects_parallelism_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        for limit in [0, MAX_PARALLEL_ALLOWED + 1] {
            let orchestrator = orchestrator_with_limit(limit, dir.path().to_path_buf());
            let result = orchestrator
                .run(
                    &[dir.path().join("a.docx")],
                    &dir.path().join("out.zip"),
                    None,
                    CancelFlag::new(),
                )
                .await;
            assert!(matches!(
                result,
                Err(OrchestratorError::InvalidParallelism { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_rejects_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator_with_limit(4, dir.path().to_path_buf());
        let result = orchestrator
            .run(&[], &dir.path().join("out.zip"), None, CancelFlag::new())
            .await;
        assert!(matches!(result, Err(OrchestratorError::EmptyBatch)));
    }

    #[tokio::test]
    async fn test_rejects_duplicate_stems() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator_with_limit(4, dir.path().to_path_buf());
        let result = orchestrator
            .run(
                &[
                    PathBuf::from("/a/report.docx"),
                    PathBuf::from("/b/report.docx"),
                ],
                &dir.path().join("out.zip"),
                None,
                CancelFlag::new(),
            )
            .await;
        match result {
            Err(OrchestratorError::DuplicateStem { stem }) => assert_eq!(stem, "report"),
            other => panic!("expected DuplicateStem, got {:?}", other.err()),
        }
    }
}
