//! Sender half of the progress channel.

use tokio::sync::mpsc;

use super::events::{ProgressEvent, Severity};

/// Handle for emitting progress events.
///
/// Cheaply cloneable and shareable across tasks. A dropped or saturated
/// receiver is logged and otherwise ignored: the presentation layer being
/// slow or gone must never fail the batch run.
#[derive(Clone)]
pub struct ProgressHandle {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ProgressHandle {
    /// Creates a handle from a channel sender.
    pub fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Creates a handle together with its receiving end.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }

    /// Emits an event, waiting for channel capacity.
    pub async fn emit(&self, event: ProgressEvent) {
        if let Err(e) = self.tx.send(event).await {
            tracing::debug!("progress receiver gone: {}", e);
        }
    }

    /// Emits an event without blocking; used from synchronous contexts.
    pub fn try_emit(&self, event: ProgressEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::debug!("progress event dropped: {}", e);
        }
    }

    /// Emits a status line.
    pub async fn status(&self, message: impl Into<String>, severity: Severity) {
        self.emit(ProgressEvent::status(message, severity)).await;
    }
}
