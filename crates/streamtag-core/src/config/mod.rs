//! Configuration types for Streamtag.
//!
//! Loaded from a single YAML file (`streamtag.yaml`):
//!
//! ```yaml
//! app: chat
//! signing:
//!   private_key_file: keys/private.key
//!   public_key_file: keys/public.key
//!   purpose: default
//! logging:
//!   filter: info
//! ```
//!
//! Relative key paths are resolved against the directory of the file.

pub mod signing;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::global_id::validate_app;
pub use signing::SigningConfig;

/// Complete Streamtag configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamTagConfig {
    /// Application name, used as the host of every global id.
    #[serde(default = "default_app")]
    pub app: String,

    /// Signed global id settings.
    #[serde(default)]
    pub signing: SigningConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for StreamTagConfig {
    fn default() -> Self {
        Self {
            app: default_app(),
            signing: SigningConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StreamTagConfig {
    /// Load configuration from a YAML file, resolving key paths relative to it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        config.signing.private_key_file = config
            .signing
            .private_key_file
            .map(|f| relative_to(&base_dir, f));
        config.signing.public_key_file = config
            .signing
            .public_key_file
            .map(|f| relative_to(&base_dir, f));

        Ok(config)
    }

    /// Parse and validate configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_app(&self.app).map_err(|e| ConfigError::Config(e.to_string()))?;
        if self.signing.purpose.trim().is_empty() {
            return Err(ConfigError::Config(
                "signing.purpose must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn relative_to(base_dir: &Path, file: PathBuf) -> PathBuf {
    if file.is_absolute() {
        file
    } else {
        base_dir.join(file)
    }
}

fn default_app() -> String {
    "streamtag".to_string()
}

fn default_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = StreamTagConfig::from_yaml("{}").unwrap();
        assert_eq!(config.app, "streamtag");
        assert_eq!(config.signing.purpose, "default");
        assert_eq!(
            config.signing.private_key_env.as_deref(),
            Some("STREAMTAG_PRIVATE_KEY")
        );
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
app: chat
signing:
  private_key_file: /etc/streamtag/private.key
  purpose: stream
logging:
  filter: streamtag=debug
"#;
        let config = StreamTagConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.app, "chat");
        assert_eq!(config.signing.purpose, "stream");
        assert_eq!(
            config.signing.private_key_file,
            Some(PathBuf::from("/etc/streamtag/private.key"))
        );
        assert_eq!(config.logging.filter, "streamtag=debug");
    }

    #[test]
    fn test_rejects_invalid_app() {
        let err = StreamTagConfig::from_yaml("app: my_app").unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn test_rejects_blank_purpose() {
        let err = StreamTagConfig::from_yaml("signing:\n  purpose: ' '\n").unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn test_key_paths_relative_to_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("streamtag.yaml");
        fs::write(
            &path,
            "app: chat\nsigning:\n  private_key_file: keys/private.key\n",
        )
        .unwrap();

        let config = StreamTagConfig::from_file(&path).unwrap();
        assert_eq!(
            config.signing.private_key_file,
            Some(dir.path().join("keys/private.key"))
        );
    }
}
