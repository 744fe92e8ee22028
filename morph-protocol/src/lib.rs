//! # morph-protocol
//!
//! Wire protocol implementation for morph (MTP - morph text protocol).
//!
//! This crate provides:
//! - Text framing with an ASCII decimal length prefix
//! - A stateful decoder that reassembles frames from arbitrary stream chunks
//! - Request encoding (`action length message`) and the action vocabulary
//! - Protocol error taxonomy

pub mod codec;
pub mod error;
pub mod frame;
pub mod message;

pub use codec::{Decoder, Encoder};
pub use error::ProtocolError;
pub use frame::{Frame, SEPARATOR};
pub use message::{Action, Request};

/// Default host for morph servers.
pub const DEFAULT_HOST: &str = "localhost";

/// Default port for morph servers.
pub const DEFAULT_PORT: u16 = 8080;

/// Maximum frame payload size (64 KiB).
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;
