//! Session initiation: spawns the per-request relay pipeline.

use std::sync::Arc;

use futures::StreamExt;
use relay_provider_deepseek::DeepSeek;
#[allow(unused_imports)] // RelayEvent used in doc links
use relay_types::RelayEvent;
use relay_types::{ChatMessage, RelayHandle};
use tokio_util::sync::CancellationToken;

use crate::emitter::RelayEmitter;
use crate::parser::{Parsed, StreamParser};

/// Capacity of a session's event channel.
const SESSION_CHANNEL_CAPACITY: usize = 32;

/// The relay entry point.
///
/// Owns the shared upstream client; sessions run concurrently and share no
/// mutable state beyond it.
pub struct Relay {
    upstream: Arc<DeepSeek>,
}

impl Relay {
    /// Create a relay over the given upstream client.
    #[must_use]
    pub fn new(upstream: DeepSeek) -> Self {
        Self {
            upstream: Arc::new(upstream),
        }
    }

    /// Start a streaming session for one user message.
    ///
    /// Spawns the upstream → parser → emitter pipeline on its own background
    /// task and returns immediately. Events arrive over the handle in
    /// upstream order and end with exactly one terminal event:
    /// [`RelayEvent::Final`] on completion (explicit sentinel or upstream
    /// close) or [`RelayEvent::Error`] on failure. Cancelling (or dropping)
    /// the handle stops the session between line reads.
    pub fn stream_message(&self, message: ChatMessage) -> RelayHandle {
        let (emitter, rx) = RelayEmitter::channel(SESSION_CHANNEL_CAPACITY);
        let cancellation = CancellationToken::new();
        let upstream = Arc::clone(&self.upstream);
        let session_token = cancellation.clone();

        tokio::spawn(async move {
            run_session(upstream, message, emitter, session_token).await;
        });

        RelayHandle::new(rx, cancellation)
    }

    /// Send one message and wait for the complete reply.
    ///
    /// Never fails from the caller's point of view: any error along the way
    /// (connection, HTTP status, decode, missing fields) is classified,
    /// logged, and converted into a bot message embedding the diagnostic.
    pub async fn send_message(&self, message: ChatMessage) -> ChatMessage {
        match self.upstream.complete(&message).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, fatal = err.is_fatal(), "completion failed");
                ChatMessage::bot(format!(
                    "Sorry, something went wrong while processing your request: {err}"
                ))
            }
        }
    }
}

/// One streaming session: read lines until the sentinel, an error, upstream
/// close, or cancellation.
async fn run_session(
    upstream: Arc<DeepSeek>,
    message: ChatMessage,
    mut emitter: RelayEmitter,
    cancellation: CancellationToken,
) {
    let mut lines = match upstream.open(&message, cancellation.clone()).await {
        Ok(lines) => lines,
        Err(err) => {
            tracing::warn!(error = %err, "failed to open upstream stream");
            let _ = emitter.fail(err.to_string()).await;
            return;
        }
    };

    let mut parser = StreamParser::new();

    while let Some(next) = lines.next().await {
        let line = match next {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "upstream transport failed mid-stream");
                let _ = emitter.fail(err.to_string()).await;
                return;
            }
        };

        match parser.push_line(&line) {
            Parsed::Increment(text) => {
                if emitter.increment(text).await.is_err() {
                    // Caller is gone; stop consuming upstream data
                    tracing::debug!("caller channel closed, cancelling session");
                    cancellation.cancel();
                    return;
                }
            }
            Parsed::Done(content) => {
                tracing::debug!(content_len = content.len(), "stream completed at sentinel");
                let _ = emitter.finish(content).await;
                return;
            }
            Parsed::Skip => {}
        }
    }

    if cancellation.is_cancelled() {
        // Cancelled between reads; the caller has abandoned the session
        return;
    }

    // Upstream closed without the sentinel: implicit final
    tracing::debug!("upstream closed without sentinel, finishing with accumulated content");
    let _ = emitter.finish(parser.finish()).await;
}
