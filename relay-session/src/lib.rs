//! Streaming relay core.
//!
//! Sits between two streaming transports: the provider's line-delimited SSE
//! body on one side and the caller's event channel on the other. One session
//! per streaming request, each running on its own background task:
//!
//! ```text
//! caller → Relay::stream_message → DeepSeek::open → StreamParser → RelayEmitter → caller
//! ```
//!
//! [`Relay::stream_message`] returns a [`RelayHandle`] immediately; tokens
//! are delivered asynchronously over the session's dedicated channel, ending
//! with exactly one terminal event. [`Relay::send_message`] is the blocking
//! variant: one request, one complete reply, and every failure converted
//! into a diagnostic bot message.

pub mod emitter;
pub mod parser;
pub mod relay;

pub use emitter::RelayEmitter;
pub use parser::{Parsed, StreamParser};
pub use relay::Relay;

pub use relay_types::{ChatMessage, RelayError, RelayEvent, RelayHandle, Role};
