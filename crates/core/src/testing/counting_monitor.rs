//! Resource monitor mock for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::orchestrator::ResourceMonitor;

/// Monitor that counts reclamation passes and reports a fixed memory value.
#[derive(Debug, Default)]
pub struct CountingMonitor {
    memory_mb: Option<u64>,
    reclaims: AtomicUsize,
}

impl CountingMonitor {
    /// Creates a monitor that reports no memory reading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a monitor that always reports the given residency.
    pub fn with_memory(memory_mb: u64) -> Self {
        Self {
            memory_mb: Some(memory_mb),
            reclaims: AtomicUsize::new(0),
        }
    }

    /// Number of reclamation passes requested so far.
    pub fn reclaim_count(&self) -> usize {
        self.reclaims.load(Ordering::SeqCst)
    }
}

impl ResourceMonitor for CountingMonitor {
    fn resident_memory_mb(&self) -> Option<u64> {
        self.memory_mb
    }

    fn reclaim(&self) {
        self.reclaims.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_reclaims() {
        let monitor = CountingMonitor::with_memory(1024);
        assert_eq!(monitor.resident_memory_mb(), Some(1024));
        monitor.reclaim();
        monitor.reclaim();
        assert_eq!(monitor.reclaim_count(), 2);
    }
}
