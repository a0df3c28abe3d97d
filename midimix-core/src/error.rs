//! Error type shared by the transports, the mapping engine and config loading.

use std::fmt;

/// Result type for bridge operations.
pub type BridgeResult<T = ()> = Result<T, BridgeError>;

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// MIDI port or OSC socket could not be opened. Fatal at startup.
    TransportUnavailable(String),
    /// A single message could not be delivered; it is dropped.
    TransportSendFailure(String),
    /// A known feedback address arrived with an unexpected argument shape.
    MalformedFeedback { addr: String, reason: String },
    /// Unusable configuration value.
    Config(String),
}

impl BridgeError {
    pub fn malformed(addr: &str, reason: impl Into<String>) -> Self {
        BridgeError::MalformedFeedback {
            addr: addr.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the process should stop when this error surfaces.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BridgeError::TransportUnavailable(_) | BridgeError::Config(_))
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportUnavailable(e) => write!(f, "transport unavailable: {}", e),
            Self::TransportSendFailure(e) => write!(f, "send failed: {}", e),
            Self::MalformedFeedback { addr, reason } => {
                write!(f, "malformed feedback on {}: {}", addr, reason)
            }
            Self::Config(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        BridgeError::TransportSendFailure(e.to_string())
    }
}
