//! Error types for the view helpers.

use streamtag_core::GlobalIdError;
use streamtag_sgid::SgidError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HelperError {
    /// Every key passed to `stream_from` was absent or blank.
    #[error("stream_from needs at least one non-blank key")]
    EmptyKeys,

    /// The signing service failed for an entity key.
    #[error(transparent)]
    Signing(#[from] SgidError),

    /// An entity key could not be turned into a global id.
    #[error("cannot locate entity: {0}")]
    Locate(#[from] GlobalIdError),

    #[error("invalid subscription: {0}")]
    Subscription(#[from] SubscriptionError),
}

/// Reasons a subscription request is rejected before any verification.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("subscription carries neither an sgid nor an identifier")]
    MissingParams,

    /// An unsigned identifier named an entity stream directly.
    #[error("identifier part {0:?} is reserved for signed entity streams")]
    ReservedIdentifier(String),

    #[error("malformed subscription params: {0}")]
    Malformed(#[from] serde_json::Error),
}
