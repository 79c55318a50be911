//! Options handshake (`hello` -> `client_options`).

use std::time::Duration;

use tokio::time::Instant;

use mudbridge_core::error::Result;
use mudbridge_core::protocol::commands::{self, option_keys};
use mudbridge_core::protocol::{KwargStore, MessageEnvelope};

/// Session options as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientServerOptions {
    pub encoding: String,
    pub no_color: bool,
    pub use_utf8: bool,
    pub input_debug: bool,
}

impl Default for ClientServerOptions {
    fn default() -> Self {
        Self {
            encoding: "utf-8".into(),
            no_color: false,
            use_utf8: true,
            input_debug: false,
        }
    }
}

impl ClientServerOptions {
    /// Overwrite every field from `client_options` kwargs.
    ///
    /// All four keys are required. Nothing is assigned unless every key reads
    /// successfully, so a bad reply leaves the previous values intact.
    pub fn apply(&mut self, kwargs: &KwargStore) -> Result<()> {
        let encoding = kwargs.get::<String>(option_keys::ENCODING)?;
        let no_color = kwargs.get::<bool>(option_keys::NOCOLOR)?;
        let use_utf8 = kwargs.get::<bool>(option_keys::UTF8)?;
        let input_debug = kwargs.get::<bool>(option_keys::INPUTDEBUG)?;

        self.encoding = encoding;
        self.no_color = no_color;
        self.use_utf8 = use_utf8;
        self.input_debug = input_debug;
        Ok(())
    }
}

/// Tracks the handshake of the current connection.
#[derive(Debug, Default)]
pub struct OptionsNegotiator {
    requested_at: Option<Instant>,
    complete: bool,
}

impl OptionsNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous connection's handshake.
    pub fn reset(&mut self) {
        self.requested_at = None;
        self.complete = false;
    }

    /// True until `request` has been called for this connection.
    pub fn needs_request(&self) -> bool {
        self.requested_at.is_none()
    }

    /// Build the options request and start the handshake clock.
    pub fn request(&mut self) -> MessageEnvelope {
        self.requested_at = Some(Instant::now());
        self.complete = false;
        commands::hello_get_options()
    }

    /// Apply a `client_options` reply.
    pub fn handle_reply(
        &mut self,
        env: &MessageEnvelope,
        options: &mut ClientServerOptions,
    ) -> Result<()> {
        options.apply(env.kwargs())?;
        self.complete = true;
        Ok(())
    }

    /// Request sent, no valid reply within `timeout`.
    pub fn expired(&self, timeout: Duration) -> bool {
        !self.complete
            && self
                .requested_at
                .is_some_and(|at| at.elapsed() >= timeout)
    }
}
