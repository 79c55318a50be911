//! Top-level facade crate for mudbridge.
//!
//! Re-exports the protocol core and the client library so users can depend on a single crate.

pub mod core {
    pub use mudbridge_core::*;
}

pub mod client {
    pub use mudbridge_client::*;
}
