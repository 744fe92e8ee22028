//! Encoder and decoder for MTP frames and requests.

use crate::error::ProtocolError;
use crate::frame::Frame;
use crate::message::Request;
use crate::MAX_PAYLOAD_SIZE;
use bytes::BytesMut;

/// Encodes requests into wire frames.
pub struct Encoder;

impl Encoder {
    /// Encodes a request into a frame.
    pub fn encode_request(request: &Request) -> Result<BytesMut, ProtocolError> {
        Frame::from_request(request).encode()
    }
}

/// Decodes a byte stream into frames.
///
/// One decoder exists per connection. Bytes read from the stream are
/// appended with [`extend`](Decoder::extend) in whatever chunk sizes the
/// transport produces; complete frames are pulled off with
/// [`decode_frame`](Decoder::decode_frame). Between calls the buffer
/// holds only the bytes of an as-yet-incomplete trailing frame.
pub struct Decoder {
    buffer: BytesMut,
    max_payload: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_max_payload(MAX_PAYLOAD_SIZE)
    }

    /// Creates a decoder that rejects frames whose declared payload
    /// exceeds `max_payload`.
    pub fn with_max_payload(max_payload: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
            max_payload,
        }
    }

    /// Appends data to the internal buffer.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to decode the next frame from the buffer.
    pub fn decode_frame(&mut self) -> Result<Option<Frame>, ProtocolError> {
        Frame::decode_with_limit(&mut self.buffer, self.max_payload)
    }

    /// Attempts to decode the next frame and parse its payload as a
    /// request.
    pub fn decode_request(&mut self) -> Result<Option<Request>, ProtocolError> {
        match self.decode_frame()? {
            Some(frame) => Ok(Some(Request::parse(&frame.payload)?)),
            None => Ok(None),
        }
    }

    /// Returns the number of bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
