//! Batch orchestrator: fans a set of input files out to a bounded worker
//! pool, collects per-file outcomes as they complete, and hands the produced
//! files to the packager.
//!
//! Cancellation is cooperative: a shared flag is checked by tasks before
//! they start and by the collection loop between completions. In-flight
//! conversions drain; not-yet-started ones are skipped.

mod config;
mod monitor;
mod runner;
mod types;

pub use config::{OrchestratorConfig, MAX_PARALLEL_ALLOWED};
pub use monitor::{NoopMonitor, ResourceMonitor};
pub use runner::BatchOrchestrator;
pub use types::{BatchOutput, CancelFlag, OrchestratorError};
