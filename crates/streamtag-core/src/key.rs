//! Stream keys.
//!
//! A stream is named by one or more keys. Each key is either a reference to
//! a persisted entity (rendered through its signed global id) or an opaque
//! token used verbatim.

use crate::global_id::{GlobalId, GlobalIdError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a record owned by the application's persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Model name, e.g. "Room".
    pub model_name: String,
    /// Primary key, as a string.
    pub id: String,
}

impl EntityRef {
    pub fn new(model_name: impl Into<String>, id: impl ToString) -> Self {
        Self {
            model_name: model_name.into(),
            id: id.to_string(),
        }
    }

    /// Locate this entity within `app`.
    pub fn to_global_id(&self, app: &str) -> Result<GlobalId, GlobalIdError> {
        GlobalId::new(app, &self.model_name, &self.id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.model_name, self.id)
    }
}

/// A single stream key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// A persisted entity.
    Entity(EntityRef),
    /// Any other identifier, used as its string form.
    Token(String),
}

impl Key {
    pub fn entity(model_name: impl Into<String>, id: impl ToString) -> Self {
        Key::Entity(EntityRef::new(model_name, id))
    }

    pub fn token(value: impl ToString) -> Self {
        Key::Token(value.to_string())
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Key::Entity(_))
    }

    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Key::Entity(entity) => Some(entity),
            Key::Token(_) => None,
        }
    }

    /// Empty tokens carry no stream information and are dropped like absent keys.
    pub fn is_blank(&self) -> bool {
        matches!(self, Key::Token(t) if t.is_empty())
    }
}

impl From<EntityRef> for Key {
    fn from(entity: EntityRef) -> Self {
        Key::Entity(entity)
    }
}

impl From<&str> for Key {
    fn from(token: &str) -> Self {
        Key::Token(token.to_string())
    }
}

impl From<String> for Key {
    fn from(token: String) -> Self {
        Key::Token(token)
    }
}

/// Drop absent and blank keys, keeping the order of the rest.
///
/// Accepts anything convertible to `Option<Key>`, so both `Key` and
/// `Option<Key>` sequences work.
pub fn present_keys<I, K>(keys: I) -> Vec<Key>
where
    I: IntoIterator<Item = K>,
    K: Into<Option<Key>>,
{
    keys.into_iter()
        .filter_map(|key| -> Option<Key> { key.into() })
        .filter(|key| !key.is_blank())
        .collect()
}
