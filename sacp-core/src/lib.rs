//! # sacp-core
//!
//! Core protocol implementation for the Snapmaker SACP protocol.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Header (CRC-8) and frame (ones-complement) checksums
//! - Command definitions
//! - Command payload builders
//! - Protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod packet;
pub mod payload;

pub use command::Command;
pub use error::{Error, Result};
pub use packet::Packet;
pub use payload::{HandshakeRequest, UploadDescriptor};

/// Protocol version carried in every frame header
pub const PROTOCOL_VERSION: u8 = constants::VERSION;

/// Default session port
pub const DEFAULT_PORT: u16 = constants::net::SESSION_PORT;
