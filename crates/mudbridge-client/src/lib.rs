//! mudbridge client library entry.
//!
//! This crate wires the websocket transport, listener registry, options
//! handshake, and connection state machine into one client session. It is
//! consumed by the console binary (`main.rs`) and by integration tests.

pub mod config;
pub mod dispatch;
pub mod obs;
pub mod services;
pub mod session;
pub mod transport;

pub use dispatch::{DispatchReport, Listener, ListenerRegistry};
pub use session::{
    ClientServerOptions, ConnectionSession, SendReceipt, SessionHandle, SessionState,
};
