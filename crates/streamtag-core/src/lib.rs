//! # streamtag-core
//!
//! Types shared across all Streamtag crates:
//!
//! - [`Key`] and [`EntityRef`]: the inputs of the `stream-from` marker
//! - [`GlobalId`]: the `gid://app/Model/id` locator for persisted entities
//! - [`StreamTagConfig`]: YAML configuration (app name, signing keys, logging)

pub mod config;
pub mod global_id;
pub mod key;

pub use config::{ConfigError, LoggingConfig, SigningConfig, StreamTagConfig};
pub use global_id::{GlobalId, GlobalIdError};
pub use key::{EntityRef, Key};
