//! mudbridge core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the wire-level contract (the `[command, args, kwargs]`
//! envelope) and the error surface shared by the client and any tooling. It
//! carries no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `BridgeError`/`Result` so a malformed frame
//! from the server can never take the client down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{BridgeError, ErrorCode, Result};
