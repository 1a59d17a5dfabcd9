//! # streamtag-helpers
//!
//! View helpers for live-updating pages.
//!
//! [`stream_from`] renders a marker element that a client-side `stream-from`
//! controller picks up to subscribe to a stream:
//!
//! ```html
//! <div data-controller="stream-from" data-stream-from-sgid-value="..."></div>
//! <div data-controller="stream-from" data-stream-from-identifier-value="room-1:room-2"></div>
//! ```
//!
//! [`resolve_stream`] is the server side of the same handshake: it turns the
//! values the controller subscribes with back into a stream name.

pub mod error;
pub mod stream_from;
pub mod subscription;
pub mod tag;

pub use error::{HelperError, SubscriptionError};
pub use stream_from::{Identifier, compound, resolve_identifier, stream_from};
pub use subscription::{StreamName, StreamParams, resolve_stream};
pub use tag::{Markup, Tag};
