//! Caller-side handle to a running streaming session.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::event::RelayEvent;

/// Handle to a streaming relay session.
///
/// Events arrive in upstream order via [`recv`](RelayHandle::recv); the
/// channel yields `None` once the terminal event has been consumed and the
/// session has ended.
///
/// Dropping the handle (or calling [`cancel`](RelayHandle::cancel)) signals
/// the background session to stop consuming upstream data. This is how an
/// endpoint layer propagates caller disconnect into the read loop.
pub struct RelayHandle {
    receiver: mpsc::Receiver<RelayEvent>,
    cancellation: CancellationToken,
}

impl RelayHandle {
    /// Pair a session's event receiver with its cancellation token.
    #[must_use]
    pub fn new(receiver: mpsc::Receiver<RelayEvent>, cancellation: CancellationToken) -> Self {
        Self {
            receiver,
            cancellation,
        }
    }

    /// Receive the next event, or `None` once the session has ended.
    pub async fn recv(&mut self) -> Option<RelayEvent> {
        self.receiver.recv().await
    }

    /// Stop the background session.
    ///
    /// The session checks the token between upstream line reads, so an
    /// abandoned session does not keep consuming provider output.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl Drop for RelayHandle {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
