//! Listener registry module exports.
//!
//! Re-exports the registry and the subscriber trait so downstream consumers
//! can depend on this module directly.

pub mod registry;

pub use registry::{DispatchReport, Listener, ListenerRegistry};
