//! Error taxonomy for the relay pipeline.

use thiserror::Error;

/// Errors arising anywhere in the relay pipeline.
#[derive(Debug, Error)]
pub enum RelayError {
    // Fatal errors: end the session with an `Error` event
    /// Network-level failure reaching upstream (connection refused, DNS,
    /// TLS handshake, mid-stream transport error).
    #[error("connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Upstream answered with a non-2xx status. The body is captured for
    /// diagnostics.
    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamHttp {
        /// The HTTP status code.
        status: u16,
        /// The response body text.
        body: String,
    },
    /// Failure delivering an event to the caller's channel.
    #[error("event delivery failed: {0}")]
    Delivery(String),
    /// Required configuration was absent at startup.
    #[error("configuration error: {0}")]
    Config(String),

    // Per-chunk errors: the offending chunk is skipped, the stream continues
    /// A chunk payload was not valid JSON.
    #[error("malformed chunk: {0}")]
    Decode(String),
    /// A chunk decoded as JSON but did not carry the expected shape.
    #[error("unexpected chunk shape: {0}")]
    Protocol(String),
}

impl RelayError {
    /// Whether this error ends the session.
    ///
    /// [`Decode`](RelayError::Decode) and [`Protocol`](RelayError::Protocol)
    /// are per-chunk: the chunk is skipped and the stream continues.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RelayError::Decode(_) | RelayError::Protocol(_))
    }
}
