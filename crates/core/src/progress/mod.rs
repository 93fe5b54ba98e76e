//! Progress events emitted by the orchestrator for a presentation layer.
//!
//! The orchestrator never talks to a UI directly: it emits typed events
//! through a bounded channel and the consumer (CLI, GUI, test harness)
//! renders them however it likes. Emission is best-effort and never fails
//! the batch run.

mod events;
mod handle;

pub use events::{FinishedPayload, ProgressEvent, Severity};
pub use handle::ProgressHandle;
