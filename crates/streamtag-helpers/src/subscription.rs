//! Resolving `stream-from` subscriptions back to stream names.
//!
//! The client controller subscribes with whichever value the marker carried:
//!
//! ```json
//! {"sgid": "En0KEwoEZ2lk..."}
//! {"identifier": "room-1:room-2"}
//! ```
//!
//! A signed id is verified and mapped to the entity's stream name. An
//! identifier is split on `:` and every signed part in it is verified and
//! replaced by its entity's stream name, so a compound marker subscribes to
//! the same stream no matter when it was rendered. Unsigned parts are kept
//! as they are, except that they may not name an entity stream themselves.

use crate::error::{HelperError, SubscriptionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use streamtag_core::key::present_keys;
use streamtag_core::{EntityRef, GlobalId, GlobalIdError, Key};
use streamtag_sgid::{SgidVerifier, looks_signed};

const SEPARATOR: char = ':';

/// Parameters sent by the `stream-from` controller when subscribing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sgid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl StreamParams {
    pub fn from_json(json: &str) -> Result<Self, SubscriptionError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Name of the stream broadcasts are published to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamName(String);

impl StreamName {
    /// Stream name for a single entity, as broadcasters compute it.
    pub fn for_entity(app: &str, entity: &EntityRef) -> Result<Self, GlobalIdError> {
        Ok(Self::for_global_id(&entity.to_global_id(app)?))
    }

    /// Stream name for the keys a marker was rendered from, as broadcasters
    /// compute it. Entities stand for their global id param and tokens for
    /// themselves, joined with `:`.
    pub fn for_keys<I, K>(app: &str, keys: I) -> Result<Self, HelperError>
    where
        I: IntoIterator<Item = K>,
        K: Into<Option<Key>>,
    {
        let keys = present_keys(keys);
        if keys.is_empty() {
            return Err(HelperError::EmptyKeys);
        }

        let parts = keys
            .iter()
            .map(|key| -> Result<String, HelperError> {
                match key {
                    Key::Entity(entity) => Ok(entity.to_global_id(app)?.to_param()),
                    Key::Token(token) => Ok(token.clone()),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(parts.join(&SEPARATOR.to_string())))
    }

    pub fn for_global_id(gid: &GlobalId) -> Self {
        Self(gid.to_param())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn subscription params into the stream to follow.
///
/// A present `sgid` takes precedence and must verify. Otherwise a non-empty
/// `identifier` is normalized part by part.
pub fn resolve_stream(
    verifier: &SgidVerifier,
    params: &StreamParams,
) -> Result<StreamName, HelperError> {
    if let Some(sgid) = params.sgid.as_deref().filter(|s| !s.is_empty()) {
        let gid = verifier.locate(sgid).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected stream-from subscription");
        })?;
        tracing::debug!(gid = %gid, "resolved entity stream");
        return Ok(StreamName::for_global_id(&gid));
    }

    match params.identifier.as_deref() {
        Some(identifier) if !identifier.is_empty() => normalize_identifier(verifier, identifier),
        _ => {
            tracing::warn!("stream-from subscription without sgid or identifier");
            Err(SubscriptionError::MissingParams.into())
        }
    }
}

fn normalize_identifier(
    verifier: &SgidVerifier,
    identifier: &str,
) -> Result<StreamName, HelperError> {
    // A raw URI would be split apart below, so catch it whole
    if identifier.contains("gid://") {
        tracing::warn!(identifier, "unsigned identifier names a global id");
        return Err(SubscriptionError::ReservedIdentifier(identifier.to_string()).into());
    }

    let parts = identifier
        .split(SEPARATOR)
        .map(|part| normalize_part(verifier, part))
        .collect::<Result<Vec<_>, _>>()?;

    let stream = StreamName(parts.join(&SEPARATOR.to_string()));
    tracing::debug!(stream = %stream, "resolved identifier stream");
    Ok(stream)
}

fn normalize_part(verifier: &SgidVerifier, part: &str) -> Result<String, HelperError> {
    if looks_signed(part) {
        let gid = verifier.locate(part).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected signed identifier part");
        })?;
        return Ok(gid.to_param());
    }

    if GlobalId::from_param(part).is_ok() {
        tracing::warn!(part, "unsigned identifier part names an entity stream");
        return Err(SubscriptionError::ReservedIdentifier(part.to_string()).into());
    }

    Ok(part.to_string())
}
