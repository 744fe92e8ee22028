//! High-level client API.

use crate::connection::{Connection, ConnectionConfig};
use crate::error::ClientError;
use crate::handler::FrameHandler;
use morph_protocol::{Action, Request};

/// High-level client for morph servers.
///
/// Wraps a [`Connection`] with action-level operations, keeping the
/// half-duplex order: every send happens before the first drain.
pub struct Client {
    conn: Connection,
}

impl Client {
    /// Connects to the server.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ClientError> {
        Ok(Self {
            conn: Connection::connect(config).await?,
        })
    }

    /// Sends a single action/message pair.
    pub async fn send(&mut self, action: Action, message: &str) -> Result<(), ClientError> {
        self.conn.send(&Request::from_action(action, message)).await
    }

    /// Sends an already-built request.
    pub async fn send_request(&mut self, request: &Request) -> Result<(), ClientError> {
        self.conn.send(request).await
    }

    /// Drains responses until the server closes the stream, handing each
    /// payload to `handler` in order. Returns the number of responses
    /// delivered.
    pub async fn drain_responses<H: FrameHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<usize, ClientError> {
        self.conn.drain(handler).await
    }

    /// Closes the connection.
    pub async fn close(self) -> Result<(), ClientError> {
        self.conn.close().await
    }
}
