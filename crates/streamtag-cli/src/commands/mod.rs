//! CLI command implementations.

pub mod keys;
pub mod render;
pub mod sgid;

use anyhow::Context;
use streamtag_core::StreamTagConfig;
use streamtag_sgid::keys::public_key_from_path_or_hex;
use streamtag_sgid::{BiscuitSigner, PublicKey, SgidVerifier, SigningKey};

const MISSING_PRIVATE_KEY: &str = "Private key not provided. \
    Pass --key <path|hex>, set STREAMTAG_PRIVATE_KEY, \
    or configure signing.private_key_file";

/// Configuration plus key material given on the command line.
pub struct Settings {
    pub config: StreamTagConfig,
    private_key: Option<String>,
    public_key: Option<String>,
}

impl Settings {
    pub fn new(
        config: StreamTagConfig,
        private_key: Option<String>,
        public_key: Option<String>,
    ) -> Self {
        Self {
            config,
            private_key,
            public_key,
        }
    }

    /// Flag or env var first, then the config file's key sources.
    fn signing_key(&self) -> anyhow::Result<SigningKey> {
        let key = match &self.private_key {
            Some(key) => key.clone(),
            None => self
                .config
                .signing
                .resolve_private_key()?
                .context(MISSING_PRIVATE_KEY)?,
        };
        SigningKey::from_path_or_hex(&key).context("Failed to load private key")
    }

    /// Falls back to the private key's public half when no public key is given.
    fn public_key(&self) -> anyhow::Result<PublicKey> {
        let key = match &self.public_key {
            Some(key) => Some(key.clone()),
            None => self.config.signing.resolve_public_key()?,
        };
        match key {
            Some(key) => public_key_from_path_or_hex(&key).context("Failed to load public key"),
            None => Ok(self.signing_key()?.public_key()),
        }
    }

    pub fn signer(&self) -> anyhow::Result<BiscuitSigner> {
        Ok(BiscuitSigner::new(self.signing_key()?, self.config.app.clone())
            .with_purpose(self.config.signing.purpose.clone()))
    }

    pub fn verifier(&self) -> anyhow::Result<SgidVerifier> {
        Ok(SgidVerifier::new(self.public_key()?).with_purpose(self.config.signing.purpose.clone()))
    }
}
