//! Events delivered over a streaming session's channel.

/// An event emitted by a streaming relay session.
///
/// A session delivers zero or more [`Increment`](RelayEvent::Increment)s in
/// upstream arrival order, followed by exactly one terminal event:
/// [`Final`](RelayEvent::Final) on success or [`Error`](RelayEvent::Error)
/// on failure. Nothing is delivered after the terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// An incremental content fragment, exactly as received from upstream.
    /// The empty string is a valid increment.
    Increment(String),
    /// The stream completed; carries the full accumulated content.
    Final(String),
    /// The session failed; carries a human-readable diagnostic.
    Error(String),
}

impl RelayEvent {
    /// Whether this event ends the session.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RelayEvent::Final(_) | RelayEvent::Error(_))
    }
}
