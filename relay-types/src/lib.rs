//! Shared types for the token-relay workspace.
//!
//! - [`ChatMessage`] / [`Role`]: the message shape exchanged with callers.
//! - [`RelayEvent`]: events delivered over a streaming session's channel.
//! - [`RelayError`]: the error taxonomy for the whole pipeline.
//! - [`RelayHandle`]: the caller's handle to a running streaming session.

pub mod error;
pub mod event;
pub mod handle;
pub mod message;

pub use error::RelayError;
pub use event::RelayEvent;
pub use handle::RelayHandle;
pub use message::{ChatMessage, Role};
