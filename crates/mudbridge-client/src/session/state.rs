use std::fmt;

/// Lifecycle of a [`ConnectionSession`](super::ConnectionSession).
///
/// `Disconnected -> Connecting -> Negotiating -> Ready`, and back to
/// `Disconnected` from any state on close or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No transport.
    #[default]
    Disconnected,
    /// Transport handshake in flight.
    Connecting,
    /// Transport open, options handshake outstanding.
    Negotiating,
    /// Options negotiated; application traffic flows both ways.
    Ready,
}

impl SessionState {
    /// Transport is open (negotiated or not).
    pub fn is_connected(self) -> bool {
        matches!(self, SessionState::Negotiating | SessionState::Ready)
    }

    pub fn is_connecting(self) -> bool {
        self == SessionState::Connecting
    }

    pub fn is_ready(self) -> bool {
        self == SessionState::Ready
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Negotiating => "negotiating",
            SessionState::Ready => "ready",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
