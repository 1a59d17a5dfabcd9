//! # streamtag-sgid
//!
//! Signed global ids: tamper-evident, optionally expiring references to a
//! persisted entity.
//!
//! A signed id is a Biscuit token whose authority block carries:
//!
//! | Fact | Meaning |
//! |------|---------|
//! | `gid("gid://app/Model/id")` | the located entity |
//! | `purpose("default")` | what the id may be used for |
//! | `signed_at(ts)` | unix timestamp of minting |
//!
//! Expiring ids get one more block holding `expires_at(ts)` and a
//! `check if time($time), $time < ts` check, so any holder of the public key
//! can verify them offline.

pub mod error;
pub mod keys;
pub mod signer;
pub mod verifier;

pub use biscuit_auth::PublicKey;
pub use error::SgidError;
pub use keys::SigningKey;
pub use signer::{BiscuitSigner, Expiry, SignGlobalId, SignedGlobalId};
pub use verifier::{SgidVerifier, VerifiedSgid, looks_signed};
