//! Decode-once codec for websocket messages.
//!
//! - Text frames are passed through as-is.
//! - Binary frames must carry UTF-8 text and are treated like text frames.
//! - Ping/Pong are surfaced as `Control`; tungstenite answers pings itself.

use bytes::Bytes;
use tokio_tungstenite::tungstenite::Message;

use mudbridge_core::error::{BridgeError, Result};

#[derive(Debug)]
pub enum Inbound {
    Text(String),
    Control,
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => Ok(Inbound::Text(s.as_str().to_owned())),
        Message::Binary(b) => utf8_payload(&b).map(Inbound::Text),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(Inbound::Control),
        Message::Close(_) => Ok(Inbound::Close),
    }
}

fn utf8_payload(b: &Bytes) -> Result<String> {
    std::str::from_utf8(b)
        .map(str::to_owned)
        .map_err(|e| BridgeError::decode(&String::from_utf8_lossy(b), format!("binary frame is not utf-8: {e}")))
}

/// Outbound text frame.
pub fn encode(text: String) -> Message {
    Message::Text(text.into())
}
