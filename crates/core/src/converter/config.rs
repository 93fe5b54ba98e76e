//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for single-file conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to the primary converter tool.
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Path to an optional fallback converter tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_program: Option<PathBuf>,

    /// Additional arguments appended to every converter invocation.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Maximum conversion attempts per file.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Hard wall-clock timeout for one conversion attempt, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Length of one backoff unit in milliseconds. The pause before retry
    /// `n` is `min(n * 3, 15)` units.
    #[serde(default = "default_backoff_unit")]
    pub backoff_unit_ms: u64,

    /// Extension of produced output files.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

fn default_program() -> PathBuf {
    PathBuf::from("soffice")
}

fn default_max_retries() -> u32 {
    5
}

fn default_timeout() -> u64 {
    600 // 10 minutes
}

fn default_backoff_unit() -> u64 {
    1000
}

fn default_output_extension() -> String {
    "pdf".to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            fallback_program: None,
            extra_args: Vec::new(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout(),
            backoff_unit_ms: default_backoff_unit(),
            output_extension: default_output_extension(),
        }
    }
}

impl ConverterConfig {
    /// Sets the maximum attempts per file.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the per-attempt timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the backoff unit length in milliseconds.
    pub fn with_backoff_unit(mut self, backoff_unit_ms: u64) -> Self {
        self.backoff_unit_ms = backoff_unit_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.program, PathBuf::from("soffice"));
        assert!(config.fallback_program.is_none());
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout_secs, 600);
        assert_eq!(config.output_extension, "pdf");
    }

    #[test]
    fn test_config_builder() {
        let config = ConverterConfig::default()
            .with_max_retries(3)
            .with_timeout(60)
            .with_backoff_unit(0);

        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.backoff_unit_ms, 0);
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            program = "/usr/bin/soffice"
        "#;
        let config: ConverterConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.program, PathBuf::from("/usr/bin/soffice"));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.backoff_unit_ms, 1000);
    }

    #[test]
    fn test_config_serialization() {
        let config = ConverterConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ConverterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.max_retries, config.max_retries);
        assert_eq!(parsed.timeout_secs, config.timeout_secs);
    }
}
