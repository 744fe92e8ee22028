//! Text frame format for MTP.
//!
//! Frame layout:
//!
//! ```text
//! +--------------+-----------+----------------+
//! | length       | separator | payload        |
//! | ASCII digits |  1 space  | `length` bytes |
//! +--------------+-----------+----------------+
//! ```
//!
//! Frames are written back to back with no trailing delimiter; the next
//! frame's length run begins immediately after the previous payload.

use crate::error::ProtocolError;
use crate::MAX_PAYLOAD_SIZE;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Byte separating the length run from the payload.
pub const SEPARATOR: u8 = b' ';

/// A parsed MTP frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame payload, exclusive of the length prefix and separator.
    pub payload: Bytes,
}

/// Outcome of scanning the length prefix at the start of the window.
enum Prefix {
    /// The length run, the separator, or the payload has not fully
    /// arrived yet.
    Incomplete,
    /// A whole frame is available: `header` prefix bytes, then
    /// `payload` bytes.
    Complete { header: usize, payload: usize },
}

/// Scans `length SEPARATOR payload` at the front of `buf` without
/// consuming anything.
fn scan_prefix(buf: &[u8], max_payload: usize) -> Result<Prefix, ProtocolError> {
    let digits = buf.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return match buf.first() {
            None => Ok(Prefix::Incomplete),
            Some(&byte) => Err(ProtocolError::MalformedLength { byte }),
        };
    }

    let mut declared: u64 = 0;
    for &b in &buf[..digits] {
        declared = declared * 10 + u64::from(b - b'0');
        // Checked per digit so an oversized frame is rejected while its
        // length run is still arriving and the window stays bounded.
        if declared > max_payload as u64 {
            return Err(ProtocolError::FrameTooLarge {
                size: declared,
                max: max_payload,
            });
        }
    }

    match buf.get(digits) {
        None => Ok(Prefix::Incomplete),
        Some(&SEPARATOR) => {
            let declared = declared as usize;
            if buf.len() < digits + 1 + declared {
                Ok(Prefix::Incomplete)
            } else {
                Ok(Prefix::Complete {
                    header: digits + 1,
                    payload: declared,
                })
            }
        }
        Some(&byte) => Err(ProtocolError::MalformedLength { byte }),
    }
}

impl Frame {
    /// Creates a new frame with the given payload.
    pub fn new(payload: Bytes) -> Self {
        Self { payload }
    }

    /// Creates the frame carrying a request's nested payload.
    pub fn from_request(request: &crate::message::Request) -> Self {
        Self::new(request.to_payload())
    }

    /// Encodes the frame into bytes.
    pub fn encode(&self) -> Result<BytesMut, ProtocolError> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: self.payload.len() as u64,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let length = self.payload.len().to_string();
        let mut buf = BytesMut::with_capacity(length.len() + 1 + self.payload.len());
        buf.put_slice(length.as_bytes());
        buf.put_u8(SEPARATOR);
        buf.put_slice(&self.payload);
        Ok(buf)
    }

    /// Decodes a frame from the front of `buf`.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was consumed,
    /// `Ok(None)` if more data is needed, or `Err` on malformed or
    /// oversized input. On `Ok(None)` the buffer is left untouched: it
    /// retains the partial frame from the start of its length field.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Self>, ProtocolError> {
        Self::decode_with_limit(buf, MAX_PAYLOAD_SIZE)
    }

    /// Decodes with an explicit upper bound on the payload size.
    pub fn decode_with_limit(
        buf: &mut BytesMut,
        max_payload: usize,
    ) -> Result<Option<Self>, ProtocolError> {
        match scan_prefix(buf, max_payload)? {
            Prefix::Incomplete => Ok(None),
            Prefix::Complete { header, payload } => {
                buf.advance(header);
                let payload = buf.split_to(payload).freeze();
                Ok(Some(Self { payload }))
            }
        }
    }
}
