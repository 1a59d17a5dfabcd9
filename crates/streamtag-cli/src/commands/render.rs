//! `streamtag render` - Render a stream-from marker.
//! `streamtag resolve` - Resolve subscription params to a stream name.

use streamtag_core::{EntityRef, Key};
use streamtag_helpers::{Markup, StreamName, StreamParams, resolve_stream, stream_from};
use streamtag_sgid::{Expiry, SgidError, SignGlobalId, SignedGlobalId};

use super::Settings;

const ENTITY_PREFIX: &str = "entity:";

/// `entity:Model/id` is an entity reference; anything else is a token.
pub fn parse_key(raw: &str) -> anyhow::Result<Key> {
    let Some(rest) = raw.strip_prefix(ENTITY_PREFIX) else {
        return Ok(Key::token(raw));
    };

    match rest.split_once('/') {
        Some((model, id)) if !model.is_empty() && !id.is_empty() => Ok(Key::entity(model, id)),
        _ => anyhow::bail!("Invalid entity key {raw:?}. Expected entity:Model/id"),
    }
}

pub fn render(settings: &Settings, raw_keys: &[String]) -> anyhow::Result<Markup> {
    let keys = raw_keys
        .iter()
        .map(|k| parse_key(k.as_str()))
        .collect::<anyhow::Result<Vec<_>>>()?;

    // Token-only markers never need the private key
    if keys.iter().any(Key::is_entity) {
        let signer = settings.signer()?;
        Ok(stream_from(&signer, keys)?)
    } else {
        Ok(stream_from(&NoSigner, keys)?)
    }
}

pub fn resolve(settings: &Settings, params: &str) -> anyhow::Result<StreamName> {
    let params = StreamParams::from_json(params)?;
    let verifier = settings.verifier()?;
    Ok(resolve_stream(&verifier, &params)?)
}

/// Signer for token-only keys; never called.
struct NoSigner;

impl SignGlobalId for NoSigner {
    fn sign(&self, entity: &EntityRef, _expiry: Expiry) -> Result<SignedGlobalId, SgidError> {
        Err(SgidError::SigningFailed(format!(
            "no signing key available for {entity}"
        )))
    }
}
