//! Transport layer (WebSocket).
//!
//! The session talks to the server through the [`Transport`] seam so the
//! state machine does not depend on a socket implementation:
//! - `ws`: tokio-tungstenite client used in production.
//! - `memory`: in-process pair for tests and embedding.
//! - `codec`: maps raw websocket messages to text frames once, before they
//!   reach the envelope decoder.

pub mod codec;
pub mod memory;
pub mod ws;

use async_trait::async_trait;

use mudbridge_core::error::Result;

pub use memory::{MemoryConnector, MemoryServer};
pub use ws::WsConnector;

/// Event surfaced by an open transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One complete UTF-8 text frame.
    Frame(String),
    /// Peer closed the connection (or the stream ended).
    Closed,
    /// Socket-level failure; the transport is unusable afterwards.
    Error(String),
}

/// An open connection to the game server.
#[async_trait]
pub trait Transport: Send {
    /// Write one text frame.
    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Wait for the next event. Must be cancel-safe: dropping the future
    /// before completion loses no frame.
    async fn recv(&mut self) -> TransportEvent;

    async fn close(&mut self) -> Result<()>;
}

/// Opens transports to an endpoint URL (`ws://host:port`).
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<Box<dyn Transport>>;
}
