use tokio::sync::{mpsc, oneshot, watch};

use mudbridge_core::error::{BridgeError, Result};
use mudbridge_core::protocol::{encode_for_wire, MessageEnvelope};

use crate::session::SessionState;

/// Encoded envelope waiting for the session loop to write it.
pub(crate) struct Outbound {
    pub command: String,
    pub text: String,
    pub done: oneshot::Sender<Result<()>>,
}

/// Cloneable handle for collaborators that do not own the session.
///
/// `send` never blocks: it checks readiness, encodes, and enqueues. The
/// returned [`SendReceipt`] resolves once the transport write finished.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Outbound>,
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub(crate) fn new(tx: mpsc::Sender<Outbound>, state: watch::Receiver<SessionState>) -> Self {
        Self { tx, state }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    pub fn is_connecting(&self) -> bool {
        self.state().is_connecting()
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// Wait until the session reaches `want`. Fails once the session is gone.
    pub async fn wait_for_state(&self, want: SessionState) -> Result<()> {
        let mut rx = self.state.clone();
        rx.wait_for(|s| *s == want)
            .await
            .map(|_| ())
            .map_err(|_| BridgeError::NotConnected)
    }

    /// Empty outbound envelope.
    pub fn new_message(&self, command: impl Into<String>) -> MessageEnvelope {
        MessageEnvelope::new(command)
    }

    pub fn send(&self, env: &MessageEnvelope) -> Result<SendReceipt> {
        if !self.is_ready() {
            return Err(BridgeError::NotConnected);
        }
        let text = encode_for_wire(env)?;
        let (done, rx) = oneshot::channel();
        self.tx
            .try_send(Outbound {
                command: env.command().to_owned(),
                text,
                done,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => BridgeError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => BridgeError::NotConnected,
            })?;
        Ok(SendReceipt { rx })
    }
}

/// Completion of one submitted send.
#[derive(Debug)]
pub struct SendReceipt {
    rx: oneshot::Receiver<Result<()>>,
}

impl SendReceipt {
    /// Result of the transport write. A send dropped by a disconnect (or by
    /// the session going away) resolves to `NotConnected`.
    pub async fn wait(self) -> Result<()> {
        self.rx.await.unwrap_or(Err(BridgeError::NotConnected))
    }
}
