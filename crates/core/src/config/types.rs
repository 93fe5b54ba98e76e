//! Root configuration type.

use serde::{Deserialize, Serialize};

use crate::converter::ConverterConfig;
use crate::orchestrator::OrchestratorConfig;
use crate::packager::PackagerConfig;

/// Root configuration. Every section has defaults, so an absent file or an
/// empty TOML document is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub packager: PackagerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_complete() {
        let config = Config::default();
        assert_eq!(config.converter.max_retries, 5);
        assert_eq!(config.orchestrator.max_parallel, 8);
    }

    #[test]
    fn test_empty_toml_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.converter.timeout_secs, 600);
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.orchestrator.max_parallel, config.orchestrator.max_parallel);
    }
}
