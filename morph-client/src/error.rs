//! Client error types.

use crate::handler::HandlerError;
use morph_protocol::ProtocolError;
use thiserror::Error;

/// Client errors.
///
/// End of stream is not represented here: the server closing the
/// connection, even mid-frame, is the normal end of a session.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("send failed: {0}")]
    Send(#[source] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("connect timeout")]
    Timeout,

    #[error("response handler failed: {0}")]
    Handler(#[source] HandlerError),
}
