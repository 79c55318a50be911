//! Protocol modules.
//!
//! - `envelope`: the `[command, args, kwargs]` JSON frame and its codec.
//! - `kwargs`: typed access to the keyed-argument mapping.
//! - `commands`: well-known command names and builders.
//!
//! All decoders are panic-free: malformed input is reported as
//! `BridgeError::ProtocolDecode` carrying the raw frame text.

pub mod commands;
pub mod envelope;
pub mod kwargs;

pub use envelope::{decode, encode, encode_for_wire, MessageEnvelope};
pub use kwargs::{FromKwarg, KwargMap, KwargStore, KwargValue};
