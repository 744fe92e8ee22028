//! # morph-client
//!
//! Client library for morph.
//!
//! This crate provides:
//! - Async TCP connection management for MTP sessions
//! - A strict half-duplex workflow: send every request, then drain the
//!   framed response stream until the server closes it
//! - A [`FrameHandler`] strategy for in-order, synchronous response
//!   delivery

pub mod client;
pub mod connection;
pub mod error;
pub mod handler;

pub use client::Client;
pub use connection::{Connection, ConnectionConfig};
pub use error::ClientError;
pub use handler::{FrameHandler, HandlerError};
