//! The `stream-from` marker helper.

use crate::error::HelperError;
use crate::tag::{Markup, Tag};
use streamtag_core::key::present_keys;
use streamtag_core::{EntityRef, Key};
use streamtag_sgid::{Expiry, SignGlobalId};

const CONTROLLER: &str = "stream-from";

/// What the marker identifies once keys are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Exactly one key, and it was an entity.
    Entity(EntityRef),
    /// A single token, or any compound of several keys.
    Token(String),
}

/// Render the `stream-from` marker for `keys`.
///
/// Absent and blank keys are skipped. A single entity key renders its
/// non-expiring signed global id as `data-stream-from-sgid-value`; anything
/// else renders `data-stream-from-identifier-value`.
pub fn stream_from<S, I, K>(signer: &S, keys: I) -> Result<Markup, HelperError>
where
    S: SignGlobalId + ?Sized,
    I: IntoIterator<Item = K>,
    K: Into<Option<Key>>,
{
    let tag = Tag::div().data("controller", CONTROLLER);

    let tag = match resolve_identifier(signer, keys)? {
        Identifier::Entity(entity) => {
            let sgid = signer.sign(&entity, Expiry::Never)?;
            tag.data("stream_from_sgid_value", sgid.into_string())
        }
        Identifier::Token(identifier) => tag.data("stream_from_identifier_value", identifier),
    };

    let markup = tag.render();
    tracing::debug!(markup = %markup, "rendered stream-from marker");
    Ok(markup)
}

/// Filter `keys` and decide what the marker identifies.
pub fn resolve_identifier<S, I, K>(signer: &S, keys: I) -> Result<Identifier, HelperError>
where
    S: SignGlobalId + ?Sized,
    I: IntoIterator<Item = K>,
    K: Into<Option<Key>>,
{
    let mut keys = present_keys(keys);

    match keys.len() {
        0 => Err(HelperError::EmptyKeys),
        1 => Ok(match keys.remove(0) {
            Key::Entity(entity) => Identifier::Entity(entity),
            Key::Token(token) => Identifier::Token(token),
        }),
        _ => Ok(Identifier::Token(compound(signer, &keys)?)),
    }
}

/// Join keys with `:`, signing entity keys without expiry.
pub fn compound<S>(signer: &S, keys: &[Key]) -> Result<String, HelperError>
where
    S: SignGlobalId + ?Sized,
{
    let parts = keys
        .iter()
        .map(|key| -> Result<String, HelperError> {
            match key {
                Key::Entity(entity) => Ok(signer.sign(entity, Expiry::Never)?.into_string()),
                Key::Token(token) => Ok(token.clone()),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(parts.join(":"))
}
