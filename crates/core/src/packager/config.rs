//! Configuration for the packager module.

use serde::{Deserialize, Serialize};

/// Compression applied to archive entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// DEFLATE compression.
    Deflated,
    /// No compression.
    Stored,
}

/// AES key size used when a password is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncryptionMethod {
    Aes128,
    Aes192,
    Aes256,
}

impl EncryptionMethod {
    /// Maps to the zip crate's AES mode.
    pub(crate) fn aes_mode(self) -> ::zip::AesMode {
        match self {
            Self::Aes128 => ::zip::AesMode::Aes128,
            Self::Aes192 => ::zip::AesMode::Aes192,
            Self::Aes256 => ::zip::AesMode::Aes256,
        }
    }
}

/// Configuration for archive creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagerConfig {
    /// Compression method for entries.
    #[serde(default = "default_compression")]
    pub compression: Compression,

    /// Encryption strength used when a password is set.
    #[serde(default = "default_encryption")]
    pub encryption: EncryptionMethod,
}

fn default_compression() -> Compression {
    Compression::Deflated
}

fn default_encryption() -> EncryptionMethod {
    EncryptionMethod::Aes256
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            encryption: default_encryption(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PackagerConfig::default();
        assert_eq!(config.compression, Compression::Deflated);
        assert_eq!(config.encryption, EncryptionMethod::Aes256);
    }

    #[test]
    fn test_deserialize() {
        let toml = r#"
            compression = "stored"
            encryption = "aes128"
        "#;
        let config: PackagerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.compression, Compression::Stored);
        assert_eq!(config.encryption, EncryptionMethod::Aes128);
    }
}
