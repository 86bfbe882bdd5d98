//! Transport layer for the SACP protocol
//!
//! Provides the framed TCP session stream and the UDP broadcast socket used
//! for discovery.

pub mod tcp;
pub mod udp;
pub mod error;

pub use error::{Error, Result};
pub use tcp::TcpTransport;
pub use udp::UdpBroadcast;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for frame-oriented session streams
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to device
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from device
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send raw bytes, failing if the write does not finish within `timeout`
    async fn send(&mut self, data: &[u8], timeout: Duration) -> Result<()>;

    /// Receive exactly one raw frame within `timeout`
    async fn receive_frame(&mut self, timeout: Duration) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
