//! Minting signed global ids.

use crate::error::SgidError;
use crate::keys::SigningKey;
use biscuit_auth::builder::BlockBuilder;
use biscuit_auth::macros::{check, fact};
use biscuit_auth::Biscuit;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use streamtag_core::{EntityRef, GlobalId};

/// Lifetime of a signed id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    /// Valid until the signing key is rotated.
    #[default]
    Never,
    /// Valid for a duration from now.
    In(Duration),
    /// Valid until a fixed instant.
    At(DateTime<Utc>),
}

impl Expiry {
    /// Absolute expiry instant relative to `now`, if any.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Expiry::Never => None,
            Expiry::In(duration) => Some(now + *duration),
            Expiry::At(at) => Some(*at),
        }
    }
}

/// A signed global id in its transport (base64) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedGlobalId(String);

impl SignedGlobalId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SignedGlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SignedGlobalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Something that can produce signed global ids for entities.
pub trait SignGlobalId {
    fn sign(&self, entity: &EntityRef, expiry: Expiry) -> Result<SignedGlobalId, SgidError>;
}

impl<T: SignGlobalId + ?Sized> SignGlobalId for &T {
    fn sign(&self, entity: &EntityRef, expiry: Expiry) -> Result<SignedGlobalId, SgidError> {
        (**self).sign(entity, expiry)
    }
}

/// Signs global ids as Biscuit tokens.
#[derive(Debug, Clone)]
pub struct BiscuitSigner {
    key: SigningKey,
    app: String,
    purpose: String,
}

impl BiscuitSigner {
    pub fn new(key: SigningKey, app: impl Into<String>) -> Self {
        Self {
            key,
            app: app.into(),
            purpose: "default".to_string(),
        }
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }

    /// Sign an already-located global id.
    pub fn sign_global_id(
        &self,
        gid: &GlobalId,
        expiry: Expiry,
    ) -> Result<SignedGlobalId, SgidError> {
        let now = Utc::now();

        let biscuit = Biscuit::builder()
            .fact(fact!("gid({uri})", uri = gid.to_uri()))
            .and_then(|b| b.fact(fact!("purpose({purpose})", purpose = self.purpose.clone())))
            .and_then(|b| b.fact(fact!("signed_at({ts})", ts = now.timestamp())))
            .map_err(|e| SgidError::SigningFailed(e.to_string()))?
            .build(self.key.keypair())
            .map_err(|e| SgidError::SigningFailed(e.to_string()))?;

        let biscuit = match expiry.expires_at(now) {
            None => biscuit,
            Some(expires_at) => {
                let ts = expires_at.timestamp();
                let block = BlockBuilder::new()
                    .fact(fact!("expires_at({ts})", ts = ts))
                    .and_then(|b| b.check(check!("check if time($time), $time < {ts}", ts = ts)))
                    .map_err(|e| SgidError::SigningFailed(e.to_string()))?;
                biscuit
                    .append(block)
                    .map_err(|e| SgidError::SigningFailed(e.to_string()))?
            }
        };

        let token = biscuit
            .to_base64()
            .map_err(|e| SgidError::SigningFailed(e.to_string()))?;

        tracing::debug!(gid = %gid, purpose = %self.purpose, ?expiry, "signed global id");
        Ok(SignedGlobalId(token))
    }
}

impl SignGlobalId for BiscuitSigner {
    fn sign(&self, entity: &EntityRef, expiry: Expiry) -> Result<SignedGlobalId, SgidError> {
        let gid = entity.to_global_id(&self.app)?;
        self.sign_global_id(&gid, expiry)
    }
}
