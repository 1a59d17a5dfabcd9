//! Global identifiers for persisted entities.
//!
//! A global id locates a record across the whole application:
//!
//! ```text
//! gid://<app>/<ModelName>/<model_id>
//! ```
//!
//! The model id is percent-encoded inside the URI. The `param` form is the
//! URI in unpadded URL-safe base64, suitable for stream names and URLs.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SCHEME: &str = "gid://";

/// Errors building or parsing a global id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GlobalIdError {
    #[error("not a global id (expected gid:// scheme): {0}")]
    BadScheme(String),

    #[error("invalid app name: {0:?}")]
    InvalidApp(String),

    #[error("global id is missing a model name: {0}")]
    MissingModelName(String),

    #[error("global id is missing a model id: {0}")]
    MissingModelId(String),

    #[error("invalid global id param: {0}")]
    InvalidParam(String),
}

/// Location of a single persisted entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalId {
    app: String,
    model_name: String,
    model_id: String,
}

impl GlobalId {
    pub fn new(app: &str, model_name: &str, model_id: &str) -> Result<Self, GlobalIdError> {
        validate_app(app)?;
        if model_name.is_empty() || model_name.contains('/') {
            return Err(GlobalIdError::MissingModelName(model_name.to_string()));
        }
        if model_id.is_empty() {
            return Err(GlobalIdError::MissingModelId(model_name.to_string()));
        }
        Ok(Self {
            app: app.to_string(),
            model_name: model_name.to_string(),
            model_id: model_id.to_string(),
        })
    }

    /// Parse a `gid://app/Model/id` URI.
    pub fn parse(uri: &str) -> Result<Self, GlobalIdError> {
        let rest = uri
            .strip_prefix(SCHEME)
            .ok_or_else(|| GlobalIdError::BadScheme(uri.to_string()))?;

        let mut parts = rest.splitn(3, '/');
        let app = parts.next().unwrap_or_default();
        let model_name = parts
            .next()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| GlobalIdError::MissingModelName(uri.to_string()))?;
        let raw_id = parts
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GlobalIdError::MissingModelId(uri.to_string()))?;

        let model_id = urlencoding::decode(raw_id)
            .map_err(|_| GlobalIdError::MissingModelId(uri.to_string()))?;

        Self::new(app, model_name, &model_id)
    }

    /// Decode the base64 param form.
    pub fn from_param(param: &str) -> Result<Self, GlobalIdError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(param)
            .map_err(|e| GlobalIdError::InvalidParam(e.to_string()))?;
        let uri = String::from_utf8(bytes).map_err(|e| GlobalIdError::InvalidParam(e.to_string()))?;
        Self::parse(&uri)
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn to_uri(&self) -> String {
        format!(
            "{SCHEME}{}/{}/{}",
            self.app,
            self.model_name,
            urlencoding::encode(&self.model_id)
        )
    }

    pub fn to_param(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_uri())
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

impl FromStr for GlobalId {
    type Err = GlobalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// App names end up as the URI host, so only alphanumerics and '-' are allowed.
pub fn validate_app(app: &str) -> Result<(), GlobalIdError> {
    if app.is_empty() || !app.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(GlobalIdError::InvalidApp(app.to_string()));
    }
    Ok(())
}
