//! Mock implementations for testing.
//!
//! These mirror the production trait seams so batch logic can be exercised
//! without a real converter tool or archive on disk:
//!
//! - `MockStrategy` — scripted `ConversionStrategy` with per-input behavior
//! - `MockPackager` — records packaging calls and writes a stub archive
//! - `CountingMonitor` — counts reclamation passes, reports fake memory

mod counting_monitor;
mod mock_packager;
mod mock_strategy;

pub use counting_monitor::CountingMonitor;
pub use mock_packager::{MockPackager, RecordedPackage};
pub use mock_strategy::{MockStrategy, StrategyBehavior};
