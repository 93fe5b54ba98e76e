//! Retry-loop converter implementation.
//!
//! Wraps a primary `ConversionStrategy` (and an optional fallback) in a
//! bounded-attempt loop with a hard per-attempt timeout, output validation
//! and capped backoff between attempts. Every failure mode is folded into
//! the returned `ConversionOutcome`; the caller never sees an `Err`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::config::ConverterConfig;
use super::traits::{ConversionStrategy, DocumentConverter};
use super::types::{file_display_name, ConversionOutcome};

/// Longest backoff pause, in backoff units.
const BACKOFF_CAP_UNITS: u64 = 15;

/// Converter that retries a pluggable strategy with timeout and fallback.
///
/// Strategies are injected at construction time; "no strategy available"
/// is represented by the absence of a primary and fails every attempt
/// rather than being probed for at call sites.
pub struct RetryingConverter {
    config: ConverterConfig,
    primary: Option<Arc<dyn ConversionStrategy>>,
    fallback: Option<Arc<dyn ConversionStrategy>>,
}

impl RetryingConverter {
    /// Creates a converter with no strategies attached.
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            primary: None,
            fallback: None,
        }
    }

    /// Sets the primary conversion strategy.
    pub fn with_primary(mut self, strategy: Arc<dyn ConversionStrategy>) -> Self {
        self.primary = Some(strategy);
        self
    }

    /// Sets the fallback strategy, tried after a failed primary attempt.
    pub fn with_fallback(mut self, strategy: Arc<dyn ConversionStrategy>) -> Self {
        self.fallback = Some(strategy);
        self
    }

    /// Pause before the attempt following `attempt`: `min(attempt * 3, 15)`
    /// backoff units, capping growth so the total wait stays bounded.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let units = (u64::from(attempt) * 3).min(BACKOFF_CAP_UNITS);
        Duration::from_millis(units * self.config.backoff_unit_ms)
    }

    fn output_path_for(&self, input: &Path, output_dir: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        output_dir.join(format!("{}.{}", stem, self.config.output_extension))
    }

    /// Runs one primary attempt under the configured timeout and validates
    /// the produced output. Returns the failure reason, if any.
    async fn primary_attempt(&self, input: &Path, output: &Path) -> Option<String> {
        let primary = match &self.primary {
            Some(primary) => primary,
            None => return Some("no primary conversion strategy available".to_string()),
        };

        let attempt_timeout = Duration::from_secs(self.config.timeout_secs);
        match timeout(attempt_timeout, primary.convert(input, output)).await {
            Err(_) => Some(format!(
                "timed out after {} seconds",
                self.config.timeout_secs
            )),
            Ok(Err(e)) => Some(e.to_string()),
            Ok(Ok(())) => {
                if output_is_valid(output).await {
                    None
                } else {
                    Some("output file is empty or missing after conversion".to_string())
                }
            }
        }
    }
}

#[async_trait]
impl DocumentConverter for RetryingConverter {
    fn name(&self) -> &str {
        "retrying"
    }

    async fn convert(&self, input: &Path, output_dir: &Path) -> ConversionOutcome {
        let name = file_display_name(input);

        // Preconditions are checked before any attempt is counted.
        match tokio::fs::metadata(input).await {
            Ok(meta) if meta.is_file() => {}
            _ => {
                return ConversionOutcome::failed(
                    input,
                    0,
                    format!(
                        "input file {} does not exist or is not a regular file",
                        input.display()
                    ),
                );
            }
        }
        match tokio::fs::metadata(output_dir).await {
            Ok(meta) if meta.is_dir() => {}
            _ => {
                return ConversionOutcome::failed(
                    input,
                    0,
                    format!("output directory {} does not exist", output_dir.display()),
                );
            }
        }

        let output = self.output_path_for(input, output_dir);
        let mut last_error = "no conversion attempts were made".to_string();

        for attempt in 1..=self.config.max_retries {
            // Clear residue from a previous attempt; a stale file must not
            // pass output validation.
            if tokio::fs::metadata(&output).await.is_ok() {
                if let Err(e) = tokio::fs::remove_file(&output).await {
                    warn!(
                        "could not remove leftover output {}: {}",
                        output.display(),
                        e
                    );
                }
            }

            match self.primary_attempt(input, &output).await {
                None => {
                    info!("converted {} in {} attempt(s)", name, attempt);
                    return ConversionOutcome::success(input, output, attempt);
                }
                Some(error) => {
                    warn!(
                        "{}: attempt {}/{} failed: {}",
                        name, attempt, self.config.max_retries, error
                    );
                    last_error = error;
                }
            }

            if attempt < self.config.max_retries {
                if let Some(fallback) = &self.fallback {
                    debug!("{}: trying fallback {} (attempt {})", name, fallback.name(), attempt);
                    match fallback.convert(input, &output).await {
                        Ok(()) => {
                            if output_is_valid(&output).await {
                                info!(
                                    "converted {} with fallback {} (attempt {})",
                                    name,
                                    fallback.name(),
                                    attempt
                                );
                                return ConversionOutcome::success(input, output, attempt);
                            }
                            debug!("{}: fallback produced empty or missing output", name);
                        }
                        Err(e) => {
                            debug!("{}: fallback failed: {}", name, e);
                        }
                    }
                }

                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }
        }

        warn!(
            "{}: giving up after {} attempt(s)",
            name, self.config.max_retries
        );
        ConversionOutcome::failed(
            input,
            self.config.max_retries,
            format!(
                "failed after {} attempts: {}",
                self.config.max_retries, last_error
            ),
        )
    }
}

/// Whether `path` exists and is non-empty.
async fn output_is_valid(path: &Path) -> bool {
    matches!(tokio::fs::metadata(path).await, Ok(meta) if meta.is_file() && meta.len() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockStrategy, StrategyBehavior};

    fn test_config(max_retries: u32) -> ConverterConfig {
        ConverterConfig::default()
            .with_max_retries(max_retries)
            .with_backoff_unit(0)
    }

    async fn write_input(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        tokio::fs::write(&path, b"document body").await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_input_fails_without_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let converter = RetryingConverter::new(test_config(3))
            .with_primary(Arc::new(MockStrategy::always_succeeding()));

        let outcome = converter
            .convert(&dir.path().join("absent.docx"), dir.path())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.attempts, 0);
        assert!(outcome.error.unwrap().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_missing_output_dir_fails_without_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.docx").await;
        let converter = RetryingConverter::new(test_config(3))
            .with_primary(Arc::new(MockStrategy::always_succeeding()));

        let outcome = converter
            .convert(&input, &dir.path().join("no-such-dir"))
            .await;

        assert_eq!(outcome.attempts, 0);
        assert!(outcome.error.unwrap().contains("output directory"));
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.docx").await;
        let converter = RetryingConverter::new(test_config(5))
            .with_primary(Arc::new(MockStrategy::always_succeeding()));

        let outcome = converter.convert(&input, dir.path()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts, 1);
        let output = outcome.output_path.unwrap();
        assert_eq!(output, dir.path().join("a.pdf"));
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_fail_fail_success_counts_three_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.docx").await;
        let strategy = MockStrategy::new(StrategyBehavior::Succeed);
        strategy
            .set_script_for(
                &input,
                vec![
                    StrategyBehavior::Fail("first".to_string()),
                    StrategyBehavior::Fail("second".to_string()),
                    StrategyBehavior::Succeed,
                ],
            )
            .await;

        let converter =
            RetryingConverter::new(test_config(3)).with_primary(Arc::new(strategy));
        let outcome = converter.convert(&input, dir.path()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts, 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_reports_last_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.docx").await;
        let converter = RetryingConverter::new(test_config(2))
            .with_primary(Arc::new(MockStrategy::always_failing("renderer crashed")));

        let outcome = converter.convert(&input, dir.path()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.attempts, 2);
        let error = outcome.error.unwrap();
        assert!(error.starts_with("failed after 2 attempts"));
        assert!(error.contains("renderer crashed"));
    }

    #[tokio::test]
    async fn test_empty_output_is_an_attempt_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.docx").await;
        let strategy = MockStrategy::new(StrategyBehavior::Succeed);
        strategy
            .set_script_for(
                &input,
                vec![StrategyBehavior::EmptyOutput, StrategyBehavior::Succeed],
            )
            .await;

        let converter =
            RetryingConverter::new(test_config(3)).with_primary(Arc::new(strategy));
        let outcome = converter.convert(&input, dir.path()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts, 2);
    }

    #[tokio::test]
    async fn test_timeout_resolved_by_fallback_on_first_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.docx").await;
        let primary = MockStrategy::new(StrategyBehavior::Delay(Duration::from_secs(5)));

        let converter = RetryingConverter::new(test_config(3).with_timeout(1))
            .with_primary(Arc::new(primary))
            .with_fallback(Arc::new(MockStrategy::always_succeeding()));

        let outcome = converter.convert(&input, dir.path()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts, 1);
    }

    #[tokio::test]
    async fn test_no_primary_strategy_fails_every_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.docx").await;
        let converter = RetryingConverter::new(test_config(2));

        let outcome = converter.convert(&input, dir.path()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.attempts, 2);
        assert!(outcome.error.unwrap().contains("no primary conversion strategy"));
    }

    #[tokio::test]
    async fn test_stale_output_is_removed_before_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.docx").await;
        let stale = dir.path().join("a.pdf");
        tokio::fs::write(&stale, b"stale from a previous run").await.unwrap();

        let converter = RetryingConverter::new(test_config(1))
            .with_primary(Arc::new(MockStrategy::always_failing("boom")));
        let outcome = converter.convert(&input, dir.path()).await;

        assert!(!outcome.is_success());
        assert!(!stale.exists());
    }

    #[test]
    fn test_backoff_is_capped() {
        let converter = RetryingConverter::new(
            ConverterConfig::default().with_backoff_unit(1000),
        );
        assert_eq!(converter.backoff_delay(1), Duration::from_secs(3));
        assert_eq!(converter.backoff_delay(4), Duration::from_secs(12));
        assert_eq!(converter.backoff_delay(5), Duration::from_secs(15));
        assert_eq!(converter.backoff_delay(50), Duration::from_secs(15));
    }
}
