//! Signing key configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for signed global ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Environment variable containing the private key (hex-encoded).
    #[serde(default = "default_private_key_env")]
    pub private_key_env: Option<String>,

    /// Path to the private key file.
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,

    /// Environment variable containing the public key (hex-encoded).
    #[serde(default = "default_public_key_env")]
    pub public_key_env: Option<String>,

    /// Path to the public key file.
    #[serde(default)]
    pub public_key_file: Option<PathBuf>,

    /// Purpose stamped into every signed id; verification requires a match.
    #[serde(default = "default_purpose")]
    pub purpose: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            private_key_env: default_private_key_env(),
            private_key_file: None,
            public_key_env: default_public_key_env(),
            public_key_file: None,
            purpose: default_purpose(),
        }
    }
}

impl SigningConfig {
    /// Resolve the private key from environment or file.
    pub fn resolve_private_key(&self) -> Result<Option<String>, std::io::Error> {
        resolve_key(self.private_key_env.as_deref(), self.private_key_file.as_ref())
    }

    /// Resolve the public key from environment or file.
    pub fn resolve_public_key(&self) -> Result<Option<String>, std::io::Error> {
        resolve_key(self.public_key_env.as_deref(), self.public_key_file.as_ref())
    }
}

fn resolve_key(
    env: Option<&str>,
    file: Option<&PathBuf>,
) -> Result<Option<String>, std::io::Error> {
    // Environment wins over the file
    if let Some(var) = env
        && let Ok(key) = std::env::var(var)
        && !key.trim().is_empty()
    {
        return Ok(Some(key.trim().to_string()));
    }

    if let Some(path) = file
        && path.exists()
    {
        let key = std::fs::read_to_string(path)?;
        return Ok(Some(key.trim().to_string()));
    }

    Ok(None)
}

fn default_private_key_env() -> Option<String> {
    Some("STREAMTAG_PRIVATE_KEY".to_string())
}

fn default_public_key_env() -> Option<String> {
    Some("STREAMTAG_PUBLIC_KEY".to_string())
}

fn default_purpose() -> String {
    "default".to_string()
}
