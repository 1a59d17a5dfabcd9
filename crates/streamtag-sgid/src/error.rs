//! Error types for signed global ids.

use streamtag_core::GlobalIdError;
use thiserror::Error;

/// Errors that can occur while signing or verifying global ids.
#[derive(Debug, Error)]
pub enum SgidError {
    /// Failed to generate a signing key.
    #[error("failed to generate signing key: {0}")]
    KeyGenerationFailed(String),

    /// Failed to parse private key.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// Failed to parse public key.
    #[error("failed to parse public key: {0}")]
    InvalidPublicKey(String),

    /// The entity could not be turned into a global id.
    #[error("cannot locate entity: {0}")]
    InvalidGlobalId(#[from] GlobalIdError),

    /// Failed to mint the signed id.
    #[error("failed to sign global id: {0}")]
    SigningFailed(String),

    /// Failed to parse the signed id.
    #[error("failed to parse signed global id: {0}")]
    ParseFailed(String),

    /// Signature or embedded checks did not hold.
    #[error("signed global id verification failed: {0}")]
    VerificationFailed(String),

    /// The signed id expired.
    #[error("signed global id expired at {expired_at}")]
    Expired { expired_at: String },

    /// The signed id was minted for another purpose.
    #[error("signed global id purpose mismatch: expected {expected:?}, found {found:?}")]
    PurposeMismatch { expected: String, found: String },

    /// The signed id is missing a required fact.
    #[error("signed global id missing fact: {fact}")]
    MissingFact { fact: String },

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
