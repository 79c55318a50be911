use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, timeout, MissedTickBehavior};

use mudbridge_core::error::{BridgeError, Result};
use mudbridge_core::protocol::{commands, decode, encode_for_wire, MessageEnvelope};

use crate::config::ClientConfig;
use crate::dispatch::{Listener, ListenerRegistry};
use crate::obs::ClientMetrics;
use crate::session::handle::{Outbound, SessionHandle};
use crate::session::{ClientServerOptions, OptionsNegotiator, SessionState};
use crate::transport::{Connector, Transport, TransportEvent, WsConnector};

/// Owns the transport and the listener registry, and drives
/// connect -> options handshake -> ready.
///
/// Events are handled one at a time: an inbound frame is decoded, applied to
/// the options (for `client_options`) and delivered to every matching
/// listener before the next event is looked at.
pub struct ConnectionSession {
    endpoint: String,
    connect_timeout: Duration,
    handshake_timeout: Duration,
    tick_interval: Duration,
    auto_connect: bool,

    connector: Arc<dyn Connector>,
    transport: Option<Box<dyn Transport>>,
    state: watch::Sender<SessionState>,

    registry: ListenerRegistry,
    options: ClientServerOptions,
    negotiator: OptionsNegotiator,

    out_tx: mpsc::Sender<Outbound>,
    out_rx: mpsc::Receiver<Outbound>,

    metrics: Arc<ClientMetrics>,
}

const MIN_TICK: Duration = Duration::from_millis(1);

enum Step {
    Inbound(TransportEvent),
    Outbound(Outbound),
    Tick,
    Shutdown,
}

impl ConnectionSession {
    pub fn new(cfg: &ClientConfig, connector: Arc<dyn Connector>) -> Self {
        // tokio panics on a zero queue capacity or tick period
        let (out_tx, out_rx) = mpsc::channel(cfg.session.max_outbound_queue.max(1));
        let (state, _) = watch::channel(SessionState::Disconnected);
        Self {
            endpoint: cfg.server.endpoint(),
            connect_timeout: cfg.session.connect_timeout(),
            handshake_timeout: cfg.session.handshake_timeout(),
            tick_interval: cfg.session.tick_interval().max(MIN_TICK),
            auto_connect: cfg.session.auto_connect,
            connector,
            transport: None,
            state,
            registry: ListenerRegistry::new(),
            options: ClientServerOptions::default(),
            negotiator: OptionsNegotiator::new(),
            out_tx,
            out_rx,
            metrics: Arc::new(ClientMetrics::new()),
        }
    }

    /// Session over a real websocket.
    pub fn with_websocket(cfg: &ClientConfig) -> Self {
        Self::new(cfg, Arc::new(WsConnector::new()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    pub fn is_connecting(&self) -> bool {
        self.state().is_connecting()
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// Options negotiated with the server (defaults until the first reply).
    pub fn options(&self) -> &ClientServerOptions {
        &self.options
    }

    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.out_tx.clone(), self.state.subscribe())
    }

    /// Empty outbound envelope.
    pub fn new_message(&self, command: impl Into<String>) -> MessageEnvelope {
        MessageEnvelope::new(command)
    }

    /// Subscribe `listener` to `command`. Duplicate pairs are ignored.
    pub fn register_listener(&mut self, listener: Arc<dyn Listener>, command: &str) -> bool {
        let added = self.registry.register(listener, command);
        if added {
            tracing::debug!(%command, "listener registered");
        }
        added
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    fn set_state(&self, next: SessionState) {
        let prev = self.state.send_replace(next);
        if prev != next {
            tracing::info!(endpoint = %self.endpoint, from = %prev, to = %next, "session state");
        }
    }

    /// Open the transport and start the options handshake.
    ///
    /// No-op unless `Disconnected`.
    pub async fn connect(&mut self) -> Result<()> {
        let state = self.state();
        if state != SessionState::Disconnected {
            tracing::debug!(%state, "connect ignored");
            return Ok(());
        }

        self.set_state(SessionState::Connecting);
        let guard = ConnectingGuard::new(&self.state);
        let attempt = timeout(self.connect_timeout, self.connector.connect(&self.endpoint)).await;
        guard.disarm();
        let transport = match attempt {
            Ok(Ok(t)) => t,
            Ok(Err(e)) => {
                self.metrics.connects.inc(&[("result", "error")]);
                tracing::warn!(endpoint = %self.endpoint, error = %e, "connect failed");
                self.set_state(SessionState::Disconnected);
                return Err(e);
            }
            Err(_) => {
                self.metrics.connects.inc(&[("result", "timeout")]);
                let timeout_ms = u64::try_from(self.connect_timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(endpoint = %self.endpoint, timeout_ms, "connect timed out");
                self.set_state(SessionState::Disconnected);
                return Err(BridgeError::Timeout(format!("connect {}", self.endpoint)));
            }
        };

        self.metrics.connects.inc(&[("result", "ok")]);
        self.transport = Some(transport);
        self.negotiator.reset();
        self.set_state(SessionState::Negotiating);
        self.request_options().await
    }

    async fn request_options(&mut self) -> Result<()> {
        if !self.negotiator.needs_request() {
            return Ok(());
        }
        let hello = self.negotiator.request();
        self.write(&hello).await
    }

    /// Send an envelope and wait for the transport write.
    ///
    /// Fails with `NotConnected` (and writes nothing) unless `Ready`.
    pub async fn send(&mut self, env: &MessageEnvelope) -> Result<()> {
        if !self.is_ready() {
            tracing::warn!(command = %env.command(), state = %self.state(), "send rejected: session not ready");
            return Err(BridgeError::NotConnected);
        }
        self.write(env).await
    }

    async fn write(&mut self, env: &MessageEnvelope) -> Result<()> {
        let text = encode_for_wire(env)?;
        self.write_text(env.command(), text).await
    }

    async fn write_text(&mut self, command: &str, text: String) -> Result<()> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(BridgeError::NotConnected);
        };
        tracing::debug!(%command, frame = %text, "send");
        match transport.send_text(text).await {
            Ok(()) => {
                self.metrics.frames_out.inc(&[("command", command)]);
                Ok(())
            }
            Err(e) => {
                tracing::error!(endpoint = %self.endpoint, error = %e, "transport write failed");
                self.teardown().await;
                Err(e)
            }
        }
    }

    /// Wait for the next transport event and handle it.
    pub async fn process_next(&mut self) -> Result<()> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(BridgeError::NotConnected);
        };
        let event = transport.recv().await;
        self.handle_event(event).await
    }

    pub async fn handle_event(&mut self, event: TransportEvent) -> Result<()> {
        match event {
            TransportEvent::Frame(text) => self.handle_frame(&text).await,
            TransportEvent::Closed => {
                tracing::info!(endpoint = %self.endpoint, "connection closed by peer");
                self.teardown().await;
                Ok(())
            }
            TransportEvent::Error(msg) => {
                tracing::error!(endpoint = %self.endpoint, error = %msg, "transport error");
                self.teardown().await;
                Err(BridgeError::Transport(msg))
            }
        }
    }

    async fn handle_frame(&mut self, text: &str) -> Result<()> {
        let state = self.state();
        if !state.is_connected() {
            tracing::warn!(%state, "frame received before the connection opened");
            return Err(BridgeError::ProtocolViolation(format!("frame received while {state}")));
        }

        tracing::debug!(frame = %text, "recv");
        let env = match decode(text) {
            Ok(env) => env,
            Err(e) => {
                self.metrics.decode_errors.inc(&[]);
                tracing::warn!(error = %e, "dropping malformed frame");
                return Err(e);
            }
        };
        self.metrics.frames_in.inc(&[("command", env.command())]);

        // listeners see client_options even when applying it failed
        let applied = if env.command() == commands::CLIENT_OPTIONS {
            self.handle_client_options(&env).await
        } else {
            Ok(())
        };

        let report = self.registry.dispatch(&env);
        if report.failed > 0 {
            self.metrics
                .listener_failures
                .add(&[("command", env.command())], report.failed as u64);
        }
        applied
    }

    async fn handle_client_options(&mut self, env: &MessageEnvelope) -> Result<()> {
        if let Err(e) = self.negotiator.handle_reply(env, &mut self.options) {
            self.metrics.handshakes.inc(&[("result", "error")]);
            if self.state() == SessionState::Negotiating {
                tracing::error!(error = %e, "options handshake failed; dropping connection");
                self.teardown().await;
            } else {
                tracing::warn!(error = %e, "ignoring invalid client_options update");
            }
            return Err(e);
        }

        tracing::info!(
            encoding = %self.options.encoding,
            no_color = self.options.no_color,
            utf8 = self.options.use_utf8,
            input_debug = self.options.input_debug,
            "client options applied"
        );
        if self.state() == SessionState::Negotiating {
            self.metrics.handshakes.inc(&[("result", "ok")]);
            self.set_state(SessionState::Ready);
        }
        Ok(())
    }

    /// Periodic poll.
    ///
    /// Enforces the handshake deadline and, with `auto_connect`, starts a
    /// connection attempt when neither connecting nor connected.
    pub async fn tick(&mut self) -> Result<()> {
        if self.state() == SessionState::Negotiating && self.negotiator.expired(self.handshake_timeout) {
            self.metrics.handshakes.inc(&[("result", "timeout")]);
            tracing::warn!(endpoint = %self.endpoint, "options handshake timed out; dropping connection");
            self.teardown().await;
            return Err(BridgeError::Timeout("options handshake".into()));
        }
        if self.auto_connect && !self.is_connecting() && !self.is_connected() {
            return self.connect().await;
        }
        Ok(())
    }

    /// Write every send queued through a [`SessionHandle`].
    pub async fn flush_pending(&mut self) {
        while let Ok(out) = self.out_rx.try_recv() {
            self.flush_outbound(out).await;
        }
    }

    async fn flush_outbound(&mut self, out: Outbound) {
        if !self.is_ready() {
            self.metrics.dropped_sends.inc(&[("command", out.command.as_str())]);
            let _ = out.done.send(Err(BridgeError::NotConnected));
            return;
        }
        let res = self.write_text(&out.command, out.text).await;
        let _ = out.done.send(res);
    }

    /// Close the transport (if any) and return to `Disconnected`.
    pub async fn close(&mut self) {
        if self.state() != SessionState::Disconnected {
            tracing::info!(endpoint = %self.endpoint, "closing session");
        }
        self.teardown().await;
    }

    async fn teardown(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close().await {
                tracing::debug!(error = %e, "transport close failed");
            }
        }
        self.negotiator.reset();
        self.set_state(SessionState::Disconnected);

        // queued sends never reach the wire once disconnected
        while let Ok(out) = self.out_rx.try_recv() {
            self.metrics.dropped_sends.inc(&[("command", out.command.as_str())]);
            let _ = out.done.send(Err(BridgeError::NotConnected));
        }
    }

    /// Drive the session until `shutdown` flips to true (or its sender is
    /// dropped). Closing cancels an in-flight connect.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut tick = interval(self.tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            let step = tokio::select! {
                ev = next_event(&mut self.transport) => Step::Inbound(ev),
                Some(out) = self.out_rx.recv() => Step::Outbound(out),
                _ = tick.tick() => Step::Tick,
                _ = shutdown.changed() => Step::Shutdown,
            };

            match step {
                Step::Inbound(ev) => {
                    if let Err(e) = self.handle_event(ev).await {
                        tracing::debug!(error = %e, code = e.code().as_str(), "inbound event not handled");
                    }
                }
                Step::Outbound(out) => self.flush_outbound(out).await,
                Step::Tick => {
                    let res = tokio::select! {
                        r = self.tick() => r,
                        _ = shutdown.changed() => break,
                    };
                    if let Err(e) = res {
                        tracing::debug!(error = %e, code = e.code().as_str(), "tick");
                    }
                }
                Step::Shutdown => break,
            }
        }

        self.close().await;
        Ok(())
    }
}

async fn next_event(transport: &mut Option<Box<dyn Transport>>) -> TransportEvent {
    match transport {
        Some(t) => t.recv().await,
        None => std::future::pending().await,
    }
}

/// Puts the session back to `Disconnected` when a connect attempt is dropped
/// before the connector returns.
struct ConnectingGuard<'a> {
    state: &'a watch::Sender<SessionState>,
    armed: bool,
}

impl<'a> ConnectingGuard<'a> {
    fn new(state: &'a watch::Sender<SessionState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::info!("connect cancelled");
            self.state.send_replace(SessionState::Disconnected);
        }
    }
}
