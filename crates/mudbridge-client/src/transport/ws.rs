//! WebSocket client transport (tokio-tungstenite).

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use mudbridge_core::error::{BridgeError, Result};

use crate::transport::codec::{self, Inbound};
use crate::transport::{Connector, Transport, TransportEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects over plain `ws://`.
#[derive(Debug, Default, Clone)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, endpoint: &str) -> Result<Box<dyn Transport>> {
        let (stream, _resp) = connect_async(endpoint)
            .await
            .map_err(|e| BridgeError::Transport(format!("connect {endpoint}: {e}")))?;
        tracing::info!(%endpoint, "websocket open");
        Ok(Box::new(WsTransport { stream }))
    }
}

pub struct WsTransport {
    stream: WsStream,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.stream
            .send(codec::encode(text))
            .await
            .map_err(|e| BridgeError::Transport(format!("write failed: {e}")))
    }

    async fn recv(&mut self) -> TransportEvent {
        loop {
            let Some(incoming) = self.stream.next().await else {
                return TransportEvent::Closed;
            };
            let msg = match incoming {
                Ok(msg) => msg,
                Err(e) => return TransportEvent::Error(e.to_string()),
            };
            match codec::decode(msg) {
                Ok(Inbound::Text(text)) => return TransportEvent::Frame(text),
                Ok(Inbound::Control) => continue,
                Ok(Inbound::Close) => return TransportEvent::Closed,
                Err(e) => {
                    // non-utf8 binary payload; nothing a listener could use
                    tracing::warn!(error = %e, "dropping undecodable websocket frame");
                    continue;
                }
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.stream
            .close(None)
            .await
            .map_err(|e| BridgeError::Transport(format!("close failed: {e}")))
    }
}
