//! Configuration validation.

use crate::orchestrator::MAX_PARALLEL_ALLOWED;

use super::{types::Config, ConfigError};

/// Validate configuration values that serde cannot express:
/// - parallelism within 1..=MAX_PARALLEL_ALLOWED
/// - at least one conversion attempt
/// - non-zero attempt timeout and housekeeping interval
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let parallel = config.orchestrator.max_parallel;
    if parallel < 1 || parallel > MAX_PARALLEL_ALLOWED {
        return Err(ConfigError::ValidationError(format!(
            "orchestrator.max_parallel must be between 1 and {}, got {}",
            MAX_PARALLEL_ALLOWED, parallel
        )));
    }

    if config.converter.max_retries == 0 {
        return Err(ConfigError::ValidationError(
            "converter.max_retries must be at least 1".to_string(),
        ));
    }

    if config.converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs must be at least 1".to_string(),
        ));
    }

    if config.orchestrator.housekeeping_interval == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.housekeeping_interval must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_parallelism_bounds() {
        let mut config = Config::default();
        config.orchestrator.max_parallel = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));

        config.orchestrator.max_parallel = MAX_PARALLEL_ALLOWED + 1;
        assert!(validate_config(&config).is_err());

        config.orchestrator.max_parallel = MAX_PARALLEL_ALLOWED;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_retries_fails() {
        let mut config = Config::default();
        config.converter.max_retries = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.converter.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
