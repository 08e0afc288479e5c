//! Event delivery toward the caller's transport.

use relay_types::{RelayError, RelayEvent};
use tokio::sync::mpsc;

/// Delivers session events to the caller in arrival order.
///
/// Enforces the terminal invariant: exactly one of
/// [`finish`](RelayEmitter::finish) / [`fail`](RelayEmitter::fail) succeeds
/// per session, and no send is accepted after it. The channel closes when
/// the emitter is dropped at the end of the session task.
pub struct RelayEmitter {
    tx: mpsc::Sender<RelayEvent>,
    terminal_sent: bool,
}

impl RelayEmitter {
    /// Create an emitter and the receiving half of the session channel.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<RelayEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                terminal_sent: false,
            },
            rx,
        )
    }

    /// Deliver one content increment.
    pub async fn increment(&mut self, text: String) -> Result<(), RelayError> {
        self.send(RelayEvent::Increment(text)).await
    }

    /// Deliver the terminal `Final` event with the full accumulated content.
    pub async fn finish(&mut self, content: String) -> Result<(), RelayError> {
        self.send(RelayEvent::Final(content)).await?;
        self.terminal_sent = true;
        Ok(())
    }

    /// Deliver the terminal `Error` event with a human-readable diagnostic.
    pub async fn fail(&mut self, message: String) -> Result<(), RelayError> {
        self.send(RelayEvent::Error(message)).await?;
        self.terminal_sent = true;
        Ok(())
    }

    async fn send(&mut self, event: RelayEvent) -> Result<(), RelayError> {
        if self.terminal_sent {
            return Err(RelayError::Delivery(
                "terminal event already delivered".into(),
            ));
        }
        self.tx
            .send(event)
            .await
            .map_err(|_| RelayError::Delivery("session channel closed".into()))
    }
}
