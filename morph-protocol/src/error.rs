//! Protocol error types.

use thiserror::Error;

/// Protocol-level errors that can occur during framing or request handling.
///
/// Framing errors are fatal for the connection: once a length field is
/// malformed or oversized there is no reliable way to resynchronize a
/// stream of back-to-back length-prefixed frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed length prefix: unexpected byte {byte:#04x}")]
    MalformedLength { byte: u8 },

    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: u64, max: usize },

    #[error("message length declares {declared} bytes but {available} are present")]
    LengthMismatch { declared: u64, available: usize },

    #[error("invalid action {0:?}: must be non-empty with no whitespace")]
    InvalidAction(String),

    #[error("unknown action {0:?}")]
    UnknownAction(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid UTF-8 in payload")]
    InvalidUtf8,
}
