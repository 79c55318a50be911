use std::time::Duration;

use serde::Deserialize;
use mudbridge_core::error::{BridgeError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub session: SessionSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            session: SessionSection::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BridgeError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(BridgeError::Config("server.host must not be empty".into()));
        }
        if self.host.contains("://") || self.host.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(BridgeError::Config(
                "server.host must be a bare host name or address".into(),
            ));
        }
        if self.port == 0 {
            return Err(BridgeError::Config("server.port must not be 0".into()));
        }
        Ok(())
    }

    /// Websocket endpoint (`ws://host:port`); there is no TLS variant.
    pub fn endpoint(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,

    /// Period of the connection poll (`ConnectionSession::tick`).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Whether `tick` starts a connection attempt when idle.
    #[serde(default = "default_auto_connect")]
    pub auto_connect: bool,

    #[serde(default = "default_max_outbound_queue")]
    pub max_outbound_queue: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            auto_connect: default_auto_connect(),
            max_outbound_queue: default_max_outbound_queue(),
        }
    }
}

impl SessionSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=120_000).contains(&self.connect_timeout_ms) {
            return Err(BridgeError::Config(
                "session.connect_timeout_ms must be between 100 and 120000".into(),
            ));
        }
        if !(1_000..=300_000).contains(&self.handshake_timeout_ms) {
            return Err(BridgeError::Config(
                "session.handshake_timeout_ms must be between 1000 and 300000".into(),
            ));
        }
        if !(10..=60_000).contains(&self.tick_interval_ms) {
            return Err(BridgeError::Config(
                "session.tick_interval_ms must be between 10 and 60000".into(),
            ));
        }
        if !(1..=65_536).contains(&self.max_outbound_queue) {
            return Err(BridgeError::Config(
                "session.max_outbound_queue must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    4008
}
fn default_connect_timeout_ms() -> u64 {
    5000
}
fn default_handshake_timeout_ms() -> u64 {
    10000
}
fn default_tick_interval_ms() -> u64 {
    300
}
fn default_auto_connect() -> bool {
    true
}
fn default_max_outbound_queue() -> usize {
    256
}
