//! mudbridge console client
//!
//! - Config: YAML path as first argument (default `mudbridge.yaml`; built-in
//!   defaults when the file does not exist)
//! - Prints every `text` message from the server
//! - Sends each stdin line as `["text", [line], {}]`
//! - Ctrl-C closes the session

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use mudbridge_client::config::{self, ClientConfig};
use mudbridge_client::services::TextConsole;
use mudbridge_client::{ConnectionSession, SessionHandle};
use mudbridge_core::error::Result;
use mudbridge_core::protocol::commands;

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "mudbridge.yaml".into());
    let cfg = if Path::new(&path).exists() {
        config::load_from_file(&path)?
    } else {
        tracing::info!(%path, "config file not found, using defaults");
        ClientConfig::default()
    };

    let mut session = ConnectionSession::with_websocket(&cfg);
    session.register_listener(Arc::new(TextConsole::stdout()), commands::TEXT);

    tokio::spawn(forward_stdin(session.handle()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    tracing::info!(
        endpoint = %session.endpoint(),
        listeners = session.listener_count(),
        "mudbridge-client starting"
    );
    session.run(shutdown_rx).await?;
    tracing::info!(metrics = %session.metrics().render(), "mudbridge-client stopped");
    Ok(())
}

async fn forward_stdin(handle: SessionHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match handle.send(&commands::text(line)) {
            Ok(receipt) => {
                tokio::spawn(async move {
                    if let Err(e) = receipt.wait().await {
                        tracing::warn!(error = %e, "input not delivered");
                    }
                });
            }
            Err(e) => tracing::error!(error = %e, "can't send input"),
        }
    }
}
