//! SSE stream parser for chat-completion chunks.
//!
//! Consumes the raw line sequence produced by the upstream client, one line
//! at a time, and turns it into increments and a terminal outcome:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//! data: [DONE]
//! ```
//!
//! Lines without the `data: ` prefix (blank lines, `:` comments, heartbeats)
//! are discarded. Malformed payloads are skipped, never fatal. The parser
//! accumulates every forwarded fragment so the terminal event can carry the
//! complete content.

use relay_provider_deepseek::types::StreamChunk;

/// Prefix of an SSE data line.
const DATA_PREFIX: &str = "data: ";

/// Payload marking the end of the stream.
const DONE_SENTINEL: &str = "[DONE]";

/// Per-line parse outcome.
#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    /// A content fragment to forward. May be the empty string.
    Increment(String),
    /// The sentinel was seen; carries the full accumulated content.
    /// No further lines should be read.
    Done(String),
    /// Nothing to forward for this line.
    Skip,
}

/// Incremental parser state for one streaming session.
///
/// The accumulator always equals the concatenation of every fragment
/// returned as [`Parsed::Increment`] so far.
#[derive(Debug, Default)]
pub struct StreamParser {
    accumulated: String,
}

impl StreamParser {
    /// Create a parser with an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one raw line from the upstream response.
    pub fn push_line(&mut self, line: &str) -> Parsed {
        let Some(payload) = line.trim().strip_prefix(DATA_PREFIX) else {
            // Heartbeats, comments, blank lines
            return Parsed::Skip;
        };

        if payload == DONE_SENTINEL {
            return Parsed::Done(std::mem::take(&mut self.accumulated));
        }

        let chunk: StreamChunk = match serde_json::from_str(payload) {
            Ok(chunk) => chunk,
            Err(e) => {
                // Malformed or partial chunks must never abort the stream
                tracing::debug!(error = %e, "skipping malformed chunk");
                return Parsed::Skip;
            }
        };

        match chunk.content() {
            // The empty string is still a valid increment
            Some(content) => {
                self.accumulated.push_str(content);
                Parsed::Increment(content.to_string())
            }
            // Role-only or finish-reason-only chunk
            None => Parsed::Skip,
        }
    }

    /// Finish without having seen the sentinel, returning the accumulated
    /// content for an implicit final event.
    #[must_use]
    pub fn finish(self) -> String {
        self.accumulated
    }

    /// The content accumulated so far.
    #[must_use]
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }
}
