//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::StrategyError;
use super::types::ConversionOutcome;

/// A single way of producing an output file from an input file.
///
/// A strategy either succeeds, returns a descriptive error, or leaves an
/// empty/missing output behind; the retry loop treats the latter as a
/// failure too. Implementations must tolerate being cancelled by an
/// externally imposed timeout at any await point.
#[async_trait]
pub trait ConversionStrategy: Send + Sync {
    /// Returns the name of this strategy implementation.
    fn name(&self) -> &str;

    /// Attempts to produce `output` from `input`.
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), StrategyError>;
}

/// Converts exactly one input file into one output file in `output_dir`.
///
/// This is the seam the orchestrator dispatches through, so batch logic can
/// be tested against a mock without touching retry internals.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Converts `input` into `output_dir`, returning the terminal outcome.
    ///
    /// Never fails with an error: every failure mode is folded into the
    /// returned `ConversionOutcome`.
    async fn convert(&self, input: &Path, output_dir: &Path) -> ConversionOutcome;
}
