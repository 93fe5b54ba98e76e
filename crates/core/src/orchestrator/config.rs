//! Orchestrator configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound on parallel conversions, matching what the UI offers.
pub const MAX_PARALLEL_ALLOWED: usize = 16;

/// Configuration for the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Number of conversions running at once (1 to `MAX_PARALLEL_ALLOWED`).
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Request a resource reclamation pass every this many completions.
    #[serde(default = "default_housekeeping_interval")]
    pub housekeeping_interval: usize,

    /// Resident memory above this also triggers a reclamation pass, when the
    /// configured monitor can measure it.
    #[serde(default = "default_memory_threshold")]
    pub memory_threshold_mb: u64,

    /// Directory under which per-run scratch directories are created.
    #[serde(default = "default_temp_root")]
    pub temp_root: PathBuf,
}

fn default_max_parallel() -> usize {
    8
}

fn default_housekeeping_interval() -> usize {
    3
}

fn default_memory_threshold() -> u64 {
    500
}

fn default_temp_root() -> PathBuf {
    std::env::temp_dir().join("docpress")
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_parallel: default_max_parallel(),
            housekeeping_interval: default_housekeeping_interval(),
            memory_threshold_mb: default_memory_threshold(),
            temp_root: default_temp_root(),
        }
    }
}

impl OrchestratorConfig {
    /// Sets the parallel conversion limit.
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel;
        self
    }

    /// Sets the scratch directory root.
    pub fn with_temp_root(mut self, temp_root: PathBuf) -> Self {
        self.temp_root = temp_root;
        self
    }
}
