//! Text console: prints the payload of every `text` envelope.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use mudbridge_core::error::{BridgeError, Result};
use mudbridge_core::protocol::commands;
use mudbridge_core::protocol::MessageEnvelope;

use crate::dispatch::Listener;

pub struct TextConsole<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TextConsole<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl TextConsole<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl TextConsole<Vec<u8>> {
    /// Everything printed so far.
    pub fn contents(&self) -> String {
        let out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl<W: Write + Send> Listener for TextConsole<W> {
    fn on_message(&self, env: &MessageEnvelope) -> Result<()> {
        if env.command() != commands::TEXT {
            return Ok(());
        }
        let text = env
            .arg(0)
            .ok_or_else(|| BridgeError::ProtocolViolation("text without payload".into()))?;

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{text}")
            .and_then(|()| out.flush())
            .map_err(|e| BridgeError::Transport(format!("console write failed: {e}")))
    }
}
