//! Shared error type across mudbridge crates.

use thiserror::Error;

/// Stable error codes (used in logs, metrics labels, and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed inbound frame.
    ProtocolDecode,
    /// Frame arrived in a state that does not accept it.
    ProtocolViolation,
    /// Requested kwarg is absent.
    KwargMissing,
    /// Kwarg exists but has a different JSON type.
    KwargType,
    /// Send attempted while the session is not ready.
    NotConnected,
    /// Underlying socket failure.
    Transport,
    /// Outbound serialization failed.
    Encode,
    /// Outbound queue is at capacity.
    QueueFull,
    /// Connect or handshake deadline elapsed.
    Timeout,
    /// Invalid configuration.
    Config,
    /// Unsupported config version.
    UnsupportedVersion,
}

impl ErrorCode {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ProtocolDecode => "PROTOCOL_DECODE",
            ErrorCode::ProtocolViolation => "PROTOCOL_VIOLATION",
            ErrorCode::KwargMissing => "KWARG_MISSING",
            ErrorCode::KwargType => "KWARG_TYPE",
            ErrorCode::NotConnected => "NOT_CONNECTED",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::Encode => "ENCODE",
            ErrorCode::QueueFull => "QUEUE_FULL",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("protocol decode failed: {reason} (raw: {raw:?})")]
    ProtocolDecode { raw: String, reason: String },
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
    #[error("kwarg missing: {0}")]
    KwargMissing(String),
    #[error("kwarg {key}: expected {expected}, found {found}")]
    KwargType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("not connected")]
    NotConnected,
    #[error("transport: {0}")]
    Transport(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("outbound queue full")]
    QueueFull,
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
}

impl BridgeError {
    /// Build a decode error that keeps the offending frame text.
    pub fn decode(raw: &str, reason: impl Into<String>) -> Self {
        BridgeError::ProtocolDecode {
            raw: raw.to_owned(),
            reason: reason.into(),
        }
    }

    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::ProtocolDecode { .. } => ErrorCode::ProtocolDecode,
            BridgeError::ProtocolViolation(_) => ErrorCode::ProtocolViolation,
            BridgeError::KwargMissing(_) => ErrorCode::KwargMissing,
            BridgeError::KwargType { .. } => ErrorCode::KwargType,
            BridgeError::NotConnected => ErrorCode::NotConnected,
            BridgeError::Transport(_) => ErrorCode::Transport,
            BridgeError::Encode(_) => ErrorCode::Encode,
            BridgeError::QueueFull => ErrorCode::QueueFull,
            BridgeError::Timeout(_) => ErrorCode::Timeout,
            BridgeError::Config(_) => ErrorCode::Config,
            BridgeError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
        }
    }
}
