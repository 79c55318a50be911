//! In-process transport pair.
//!
//! Every successful `connect` creates a fresh channel pair; the client side is
//! returned to the session and the server side ([`MemoryServer`]) is handed
//! out through the receiver returned by [`MemoryConnector::new`].

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use mudbridge_core::error::{BridgeError, Result};
use mudbridge_core::protocol::{encode, MessageEnvelope};

use crate::transport::{Connector, Transport, TransportEvent};

pub struct MemoryConnector {
    servers: mpsc::UnboundedSender<MemoryServer>,
    attempts: AtomicUsize,
    refuse: AtomicBool,
    stall: AtomicBool,
}

impl MemoryConnector {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MemoryServer>) {
        let (servers, rx) = mpsc::unbounded_channel();
        let connector = Self {
            servers,
            attempts: AtomicUsize::new(0),
            refuse: AtomicBool::new(false),
            stall: AtomicBool::new(false),
        };
        (connector, rx)
    }

    /// Number of `connect` calls so far (refused and stalled ones included).
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Make subsequent connects fail with a transport error.
    pub fn set_refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::Relaxed);
    }

    /// Make subsequent connects never complete.
    pub fn set_stall(&self, stall: bool) {
        self.stall.store(stall, Ordering::Relaxed);
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, endpoint: &str) -> Result<Box<dyn Transport>> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if self.stall.load(Ordering::Relaxed) {
            std::future::pending::<()>().await;
        }
        if self.refuse.load(Ordering::Relaxed) {
            return Err(BridgeError::Transport(format!("connect {endpoint}: refused")));
        }

        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        self.servers
            .send(MemoryServer {
                endpoint: endpoint.to_owned(),
                to_client,
                from_client,
            })
            .map_err(|_| BridgeError::Transport(format!("connect {endpoint}: no listener")))?;

        Ok(Box::new(MemoryTransport {
            inbound,
            outbound,
            closed: false,
        }))
    }
}

struct MemoryTransport {
    inbound: mpsc::UnboundedReceiver<TransportEvent>,
    outbound: mpsc::UnboundedSender<String>,
    closed: bool,
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.closed {
            return Err(BridgeError::Transport("transport closed".into()));
        }
        self.outbound
            .send(text)
            .map_err(|_| BridgeError::Transport("peer gone".into()))
    }

    async fn recv(&mut self) -> TransportEvent {
        if self.closed {
            return TransportEvent::Closed;
        }
        self.inbound.recv().await.unwrap_or(TransportEvent::Closed)
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.inbound.close();
        Ok(())
    }
}

/// Server half of an in-process connection.
pub struct MemoryServer {
    endpoint: String,
    to_client: mpsc::UnboundedSender<TransportEvent>,
    from_client: mpsc::UnboundedReceiver<String>,
}

impl MemoryServer {
    /// Endpoint the client asked for.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Push a raw text frame to the client. Returns false once the client is gone.
    pub fn send_frame(&self, text: &str) -> bool {
        self.to_client
            .send(TransportEvent::Frame(text.to_owned()))
            .is_ok()
    }

    pub fn send_envelope(&self, env: &MessageEnvelope) -> Result<bool> {
        Ok(self.send_frame(&encode(env)?))
    }

    pub fn close(&self) -> bool {
        self.to_client.send(TransportEvent::Closed).is_ok()
    }

    pub fn fail(&self, reason: &str) -> bool {
        self.to_client
            .send(TransportEvent::Error(reason.to_owned()))
            .is_ok()
    }

    /// Next frame written by the client; `None` once the client side is dropped.
    pub async fn recv_frame(&mut self) -> Option<String> {
        self.from_client.recv().await
    }

    /// Frame already written by the client, if any.
    pub fn try_recv_frame(&mut self) -> Option<String> {
        self.from_client.try_recv().ok()
    }
}
