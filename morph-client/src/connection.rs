//! Connection management.

use crate::error::ClientError;
use crate::handler::FrameHandler;
use morph_protocol::{Decoder, Encoder, Request};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Default read buffer size (8 KiB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Minimum read buffer size (1 KiB).
pub const MIN_READ_BUFFER_SIZE: usize = 1024;

/// Maximum read buffer size (1 MiB).
pub const MAX_READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read buffer size for socket reads. Also the upper bound on any
    /// single response frame's payload.
    pub read_buffer_size: usize,
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: Duration::from_secs(10),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.clamp(MIN_READ_BUFFER_SIZE, MAX_READ_BUFFER_SIZE);
        self
    }
}

/// A connection to a morph server.
///
/// Sessions are strict half-duplex: send every request first, then
/// switch to [`drain`](Connection::drain) until the server closes the
/// stream. The decode buffer is owned exclusively by this connection;
/// `&mut self` on every method keeps concurrent access out by
/// construction.
pub struct Connection {
    stream: TcpStream,
    decoder: Decoder,
    read_buffer_size: usize,
}

impl Connection {
    /// Connects to the server described by `config`.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ClientError> {
        tracing::debug!("connecting to {}:{}", config.host, config.port);

        let stream = tokio::time::timeout(
            config.connect_timeout,
            TcpStream::connect((config.host.as_str(), config.port)),
        )
        .await
        .map_err(|_| ClientError::Timeout)??;

        stream.set_nodelay(true).ok();
        tracing::debug!("connected to {}:{}", config.host, config.port);

        Ok(Self {
            stream,
            decoder: Decoder::with_max_payload(config.read_buffer_size),
            read_buffer_size: config.read_buffer_size,
        })
    }

    /// Encodes and sends one request, continuing until every byte is on
    /// the wire; short writes are not errors.
    pub async fn send(&mut self, request: &Request) -> Result<(), ClientError> {
        let encoded = Encoder::encode_request(request)?;
        tracing::debug!(
            action = request.action(),
            bytes = encoded.len(),
            "sending request"
        );
        self.stream
            .write_all(&encoded)
            .await
            .map_err(ClientError::Send)?;
        Ok(())
    }

    /// Reads the response stream until the server closes it, dispatching
    /// every complete frame to `handler` in arrival order.
    ///
    /// Returns the number of frames delivered. A read of zero bytes is
    /// the normal end of the session, even if a partial frame is still
    /// buffered.
    pub async fn drain<H: FrameHandler>(&mut self, handler: &mut H) -> Result<usize, ClientError> {
        drain_frames(
            &mut self.stream,
            &mut self.decoder,
            self.read_buffer_size,
            handler,
        )
        .await
    }

    /// Shuts the connection down.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.shutdown().await?;
        tracing::debug!("connection closed");
        Ok(())
    }
}

/// Decode loop shared by [`Connection::drain`] and the tests: read a
/// chunk, extend the decode window, pull off complete frames, repeat
/// until end of stream.
async fn drain_frames<R, H>(
    reader: &mut R,
    decoder: &mut Decoder,
    buffer_size: usize,
    handler: &mut H,
) -> Result<usize, ClientError>
where
    R: AsyncRead + Unpin,
    H: FrameHandler,
{
    let mut buf = vec![0u8; buffer_size];
    let mut delivered = 0;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            if decoder.buffered() > 0 {
                tracing::debug!(
                    leftover = decoder.buffered(),
                    "stream closed mid-frame, discarding partial data"
                );
                decoder.clear();
            }
            tracing::debug!(frames = delivered, "end of response stream");
            return Ok(delivered);
        }

        decoder.extend(&buf[..n]);
        while let Some(frame) = decoder.decode_frame()? {
            handler
                .handle(&frame.payload)
                .map_err(ClientError::Handler)?;
            delivered += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerError;

    /// Collects payloads as strings.
    struct Collect(Vec<String>);

    impl FrameHandler for Collect {
        fn handle(&mut self, payload: &[u8]) -> Result<(), HandlerError> {
            self.0.push(String::from_utf8_lossy(payload).into_owned());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_drain_reassembles_across_reads() {
        // Chunk boundaries land inside the length field and the payload.
        let mut reader = tokio_test::io::Builder::new()
            .read(b"1")
            .read(b"1 hello")
            .read(b" world5 abcde")
            .build();

        let mut decoder = Decoder::new();
        let mut collect = Collect(Vec::new());
        let delivered = drain_frames(&mut reader, &mut decoder, 1024, &mut collect)
            .await
            .unwrap();

        assert_eq!(delivered, 2);
        assert_eq!(collect.0, vec!["hello world", "abcde"]);
        assert_eq!(decoder.buffered(), 0);
    }

    #[tokio::test]
    async fn test_drain_with_tiny_read_buffer() {
        let mut reader = tokio_test::io::Builder::new()
            .read(b"3 abc2 xy0 4 tail")
            .build();

        let mut decoder = Decoder::new();
        let mut collect = Collect(Vec::new());
        // A 2-byte read buffer forces every frame through partial state.
        let delivered = drain_frames(&mut reader, &mut decoder, 2, &mut collect)
            .await
            .unwrap();

        assert_eq!(delivered, 4);
        assert_eq!(collect.0, vec!["abc", "xy", "", "tail"]);
    }

    #[tokio::test]
    async fn test_eof_mid_frame_is_clean() {
        let mut reader = tokio_test::io::Builder::new().read(b"11 hel").build();

        let mut decoder = Decoder::new();
        let mut collect = Collect(Vec::new());
        let delivered = drain_frames(&mut reader, &mut decoder, 1024, &mut collect)
            .await
            .unwrap();

        assert_eq!(delivered, 0);
        assert!(collect.0.is_empty());
        // The partial remainder is discarded, not surfaced as an error.
        assert_eq!(decoder.buffered(), 0);
    }

    #[tokio::test]
    async fn test_handler_failure_stops_loop() {
        let mut reader = tokio_test::io::Builder::new()
            .read(b"5 first6 second")
            .build();

        let mut decoder = Decoder::new();
        let mut calls = 0usize;
        let mut failing = |_: &[u8]| -> Result<(), HandlerError> {
            calls += 1;
            Err("refused".into())
        };

        let result = drain_frames(&mut reader, &mut decoder, 1024, &mut failing).await;
        assert!(matches!(result, Err(ClientError::Handler(_))));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_malformed_stream_is_fatal() {
        let mut reader = tokio_test::io::Builder::new()
            .read(b"12x hello world")
            .build();

        let mut decoder = Decoder::new();
        let mut collect = Collect(Vec::new());
        let result = drain_frames(&mut reader, &mut decoder, 1024, &mut collect).await;

        assert!(matches!(
            result,
            Err(ClientError::Protocol(
                morph_protocol::ProtocolError::MalformedLength { byte: b'x' }
            ))
        ));
        assert!(collect.0.is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = ConnectionConfig::new("localhost", 8080);
        assert_eq!(config.read_buffer_size, DEFAULT_READ_BUFFER_SIZE);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_buffer_clamping() {
        let config = ConnectionConfig::new("localhost", 8080).with_read_buffer_size(100);
        assert_eq!(config.read_buffer_size, MIN_READ_BUFFER_SIZE);

        let config =
            ConnectionConfig::new("localhost", 8080).with_read_buffer_size(10 * 1024 * 1024);
        assert_eq!(config.read_buffer_size, MAX_READ_BUFFER_SIZE);
    }
}
