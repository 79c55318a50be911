//! Connection session: lifecycle state machine, options handshake, and the
//! handle used by collaborators to submit outbound envelopes.

mod connection;
mod handle;
pub mod options;
mod state;

pub use connection::ConnectionSession;
pub use handle::{SendReceipt, SessionHandle};
pub use options::{ClientServerOptions, OptionsNegotiator};
pub use state::SessionState;
