//! Ed25519 signing keys.

use crate::error::SgidError;
use biscuit_auth::{Algorithm, KeyPair, PrivateKey, PublicKey};
use rand::RngCore;
use std::path::Path;

/// Key used to mint signed global ids.
pub struct SigningKey {
    inner: KeyPair,
}

impl Clone for SigningKey {
    fn clone(&self) -> Self {
        Self::from_private_key(self.inner.private())
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Generate a new random key.
    pub fn generate() -> Result<Self, SgidError> {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);

        let private_key = PrivateKey::from_bytes(&bytes, Algorithm::Ed25519)
            .map_err(|e| SgidError::KeyGenerationFailed(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Wrap an already-parsed private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        Self {
            inner: KeyPair::from(&private_key),
        }
    }

    /// Load a key from a hex-encoded private key string.
    pub fn from_hex(hex: &str) -> Result<Self, SgidError> {
        let private_key = PrivateKey::from_bytes_hex(hex.trim(), Algorithm::Ed25519)
            .map_err(|e| SgidError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Load a key from a file holding the hex-encoded private key.
    pub fn from_file(path: &Path) -> Result<Self, SgidError> {
        Self::from_hex(&std::fs::read_to_string(path)?)
    }

    /// Accept either a path to a key file or the hex key itself.
    pub fn from_path_or_hex(value: &str) -> Result<Self, SgidError> {
        let path = Path::new(value);
        if path.exists() {
            Self::from_file(path)
        } else {
            Self::from_hex(value)
        }
    }

    /// The Biscuit key pair used to sign authority blocks.
    pub(crate) fn keypair(&self) -> &KeyPair {
        &self.inner
    }

    /// Public half, handed to [`SgidVerifier`](crate::SgidVerifier).
    pub fn public_key(&self) -> PublicKey {
        self.inner.public()
    }

    /// Hex-encoded private key, as written to `private.key`.
    pub fn private_key_hex(&self) -> String {
        self.inner.private().to_bytes_hex()
    }

    /// Hex-encoded public key, as written to `public.key`.
    pub fn public_key_hex(&self) -> String {
        self.inner.public().to_bytes_hex()
    }

    /// Write `private.key` and `public.key` into `dir`.
    pub fn save_to_dir(&self, dir: &Path) -> Result<(), SgidError> {
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join("private.key"), self.private_key_hex())?;
        std::fs::write(dir.join("public.key"), self.public_key_hex())?;
        Ok(())
    }
}

/// Parse a hex-encoded public key.
pub fn public_key_from_hex(hex: &str) -> Result<PublicKey, SgidError> {
    PublicKey::from_bytes_hex(hex.trim(), Algorithm::Ed25519)
        .map_err(|e| SgidError::InvalidPublicKey(e.to_string()))
}

/// Accept either a path to a public key file or the hex key itself.
pub fn public_key_from_path_or_hex(value: &str) -> Result<PublicKey, SgidError> {
    let path = Path::new(value);
    if path.exists() {
        public_key_from_hex(&std::fs::read_to_string(path)?)
    } else {
        public_key_from_hex(value)
    }
}
