//! Mock conversion strategy for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::converter::{ConversionStrategy, StrategyError};

/// What a mock attempt should do.
#[derive(Debug, Clone)]
pub enum StrategyBehavior {
    /// Write a small valid output file and succeed.
    Succeed,
    /// Fail with the given reason, producing no output.
    Fail(String),
    /// Report success but leave an empty output file behind.
    EmptyOutput,
    /// Sleep for the given duration, then succeed. Used for timeout tests;
    /// the sleep is an await point, so an external timeout can cut it off.
    Delay(Duration),
}

/// Mock implementation of the `ConversionStrategy` trait.
///
/// Behavior is scripted per input path so outcomes stay deterministic under
/// concurrent execution; inputs with no script use the default behavior.
///
/// # Example
///
/// ```rust,ignore
/// use docpress_core::testing::{MockStrategy, StrategyBehavior};
///
/// let strategy = MockStrategy::new(StrategyBehavior::Succeed);
/// strategy.set_script_for(
///     "/in/flaky.docx",
///     vec![
///         StrategyBehavior::Fail("transient".to_string()),
///         StrategyBehavior::Succeed,
///     ],
/// ).await;
/// ```
pub struct MockStrategy {
    default: StrategyBehavior,
    scripts: Arc<Mutex<HashMap<PathBuf, VecDeque<StrategyBehavior>>>>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockStrategy {
    /// Creates a mock whose unscripted inputs behave as `default`.
    pub fn new(default: StrategyBehavior) -> Self {
        Self {
            default,
            scripts: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock that converts everything on the first try.
    pub fn always_succeeding() -> Self {
        Self::new(StrategyBehavior::Succeed)
    }

    /// Mock whose every attempt fails with the given reason.
    pub fn always_failing(reason: impl Into<String>) -> Self {
        Self::new(StrategyBehavior::Fail(reason.into()))
    }

    /// Scripts the attempt sequence for one input path. Attempts beyond the
    /// script fall back to the default behavior.
    pub async fn set_script_for(&self, input: impl AsRef<Path>, script: Vec<StrategyBehavior>) {
        self.scripts
            .lock()
            .await
            .insert(input.as_ref().to_path_buf(), script.into());
    }

    /// Input paths of all attempts made, in call order.
    pub async fn recorded_calls(&self) -> Vec<PathBuf> {
        self.calls.lock().await.clone()
    }

    /// Number of attempts made across all inputs.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    async fn next_behavior(&self, input: &Path) -> StrategyBehavior {
        let mut scripts = self.scripts.lock().await;
        scripts
            .get_mut(input)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl ConversionStrategy for MockStrategy {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<(), StrategyError> {
        self.calls.lock().await.push(input.to_path_buf());

        match self.next_behavior(input).await {
            StrategyBehavior::Succeed => {
                tokio::fs::write(output, b"%PDF-1.7 mock output\n").await?;
                Ok(())
            }
            StrategyBehavior::Fail(reason) => Err(StrategyError::failed(reason, None)),
            StrategyBehavior::EmptyOutput => {
                tokio::fs::write(output, b"").await?;
                Ok(())
            }
            StrategyBehavior::Delay(duration) => {
                tokio::time::sleep(duration).await;
                tokio::fs::write(output, b"%PDF-1.7 delayed mock output\n").await?;
                Ok(())
            }
        }
    }
}
