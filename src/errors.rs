use std::io;

use crate::types::{EffectMode, PowerState};

/// All error types that can occur when interacting with LED controllers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The TCP connection to a controller could not be established.
    ///
    /// The session never opens; the core performs no retries.
    #[error("connection to controller {host} failed: {err:?}")]
    Connection { host: String, err: io::Error },

    /// An operation was issued on a session that has been closed.
    #[error("session to {0} is closed")]
    Closed(String),

    /// A network socket operation failed on an established connection.
    #[error("socket {action} error: {err:?}")]
    Socket { action: String, err: io::Error },

    /// The controller did not answer within the I/O window.
    ///
    /// Distinct from [`Error::Socket`] so callers can decide whether to retry.
    #[error("{action} timed out")]
    Timeout { action: String },

    /// A state reply was received but is not 14 bytes long.
    #[error("state reply has {0} bytes, expected 14")]
    FrameLength(usize),

    /// A state reply does not start with the `81 25` header.
    #[error("state reply header {first:#04x} {second:#04x}, expected 0x81 0x25")]
    FrameHeader { first: u8, second: u8 },

    /// Attempted to encode a power state with no wire representation.
    #[error("power state {0:?} has no wire encoding, use On or Off")]
    UnsupportedPower(PowerState),

    /// Attempted to encode a mode with no wire representation.
    #[error("mode {0:?} has no wire encoding")]
    UnsupportedMode(EffectMode),

    /// A percent value lies outside the valid domain.
    #[error("percent value {0} is outside [0, 100]")]
    PercentOutOfRange(u8),

    /// The discovery broadcast could not be sent; discovery is aborted.
    #[error("discovery broadcast to {addr} failed: {err:?}")]
    Broadcast { addr: String, err: io::Error },
}

impl Error {
    /// Create a new socket error
    pub fn socket(action: &str, err: io::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new timeout error
    pub fn timeout(action: &str) -> Self {
        Error::Timeout {
            action: action.to_string(),
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
