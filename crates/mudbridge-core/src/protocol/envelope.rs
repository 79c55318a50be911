//! Message envelope and its JSON codec.
//!
//! Every frame is a three element JSON array:
//! `[command, [args...], {kwargs...}]`, e.g. `["text", ["look"], {}]`.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{BridgeError, Result};
use crate::protocol::kwargs::{FromKwarg, KwargStore, KwargValue};

/// Transport-compat control character removed from outbound frames.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// One protocol message exchanged with the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageEnvelope {
    command: String,
    args: Vec<String>,
    kwargs: KwargStore,
}

impl MessageEnvelope {
    /// Empty outbound envelope for `command` (no args, no kwargs).
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            kwargs: KwargStore::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<KwargValue>) -> Self {
        self.kwargs.set(key, value);
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = command.into();
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Positional argument, if present.
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.args.get(idx).map(String::as_str)
    }

    pub fn set_args(&mut self, args: Vec<String>) {
        self.args = args;
    }

    pub fn push_arg(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    pub fn kwargs(&self) -> &KwargStore {
        &self.kwargs
    }

    pub fn kwargs_mut(&mut self) -> &mut KwargStore {
        &mut self.kwargs
    }

    pub fn get_kwarg<T: FromKwarg>(&self, key: &str) -> Result<T> {
        self.kwargs.get(key)
    }

    pub fn set_kwarg(&mut self, key: impl Into<String>, value: impl Into<KwargValue>) {
        self.kwargs.set(key, value);
    }

    pub fn has_kwarg(&self, key: &str) -> bool {
        self.kwargs.has(key)
    }

    pub fn kwarg_count(&self) -> usize {
        self.kwargs.count()
    }
}

impl Serialize for MessageEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.command, &self.args, &self.kwargs).serialize(serializer)
    }
}

/// Wire shape; a JSON array of exactly three elements.
#[derive(Deserialize)]
struct WireFrame(String, Vec<String>, KwargStore);

/// Encode an envelope as a JSON text frame.
pub fn encode(env: &MessageEnvelope) -> Result<String> {
    if env.command.is_empty() {
        return Err(BridgeError::Encode("empty command".into()));
    }
    serde_json::to_string(env).map_err(|e| BridgeError::Encode(e.to_string()))
}

/// Encode for transmission: [`encode`] with every zero-width space removed.
pub fn encode_for_wire(env: &MessageEnvelope) -> Result<String> {
    let mut text = encode(env)?;
    if text.contains(ZERO_WIDTH_SPACE) {
        text = text.replace(ZERO_WIDTH_SPACE, "");
    }
    Ok(text)
}

/// Decode a received text frame. Malformed input never yields a partial envelope.
pub fn decode(text: &str) -> Result<MessageEnvelope> {
    let WireFrame(command, args, kwargs) =
        serde_json::from_str(text).map_err(|e| BridgeError::decode(text, e.to_string()))?;
    if command.is_empty() {
        return Err(BridgeError::decode(text, "empty command"));
    }
    Ok(MessageEnvelope {
        command,
        args,
        kwargs,
    })
}
