//! TCP transport
//!
//! The session stream carries back-to-back SACP frames. A frame's length is
//! only known once its first four bytes are in, so frames are read in two
//! phases: the length prefix, then the declared remainder.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use sacp_core::constants::{MAX_FRAME_SIZE, PREAMBLE_SIZE};
use sacp_core::Packet;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

/// TCP transport for SACP devices
pub struct TcpTransport {
    addr: String,
    port: u16,
    socket_addr: Option<SocketAddr>,
    stream: Option<TcpStream>,
    connect_timeout: Duration,
}

impl TcpTransport {
    /// Create new TCP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket_addr: None,
            stream: None,
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.socket_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .collect();

        // SACP devices are IPv4-only
        let addr = addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.socket_addr = Some(*addr);
        Ok(*addr)
    }
}

/// Read into `buf` until full or the deadline passes
async fn read_exact_until(stream: &mut TcpStream, buf: &mut [u8], deadline: Instant) -> Result<()> {
    timeout_at(deadline, stream.read_exact(buf))
        .await
        .map_err(|_| Error::ReadTimeout)?
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::ConnectionClosed,
            _ => Error::Io(e),
        })?;
    Ok(())
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let addr = self.resolve_addr().await?;

        debug!("Connecting to {}...", addr);

        let stream = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::ConnectionTimeout)?
            .map_err(Error::Io)?;

        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.remote_addr());

            // Graceful shutdown
            let _ = stream.shutdown().await;
        }

        self.socket_addr = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8], timeout: Duration) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
        let deadline = Instant::now() + timeout;

        trace!("Sending {} bytes: {:02X?}", data.len(), &data[..data.len().min(16)]);

        timeout_at(deadline, async {
            stream.write_all(data).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| Error::WriteTimeout)??;

        Ok(())
    }

    async fn receive_frame(&mut self, timeout: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
        let deadline = Instant::now() + timeout;

        let mut buf = BytesMut::zeroed(Packet::LENGTH_PREFIX_SIZE);
        read_exact_until(stream, &mut buf, deadline).await?;

        let declared = Packet::declared_length(&buf).unwrap_or_default();
        let total = declared + PREAMBLE_SIZE;
        if total > MAX_FRAME_SIZE {
            return Err(Error::FrameTooLarge {
                declared,
                max: MAX_FRAME_SIZE - PREAMBLE_SIZE,
            });
        }

        buf.resize(total, 0);
        read_exact_until(stream, &mut buf[Packet::LENGTH_PREFIX_SIZE..], deadline).await?;

        trace!("Received {} bytes: {:02X?}", total, &buf[..total.min(16)]);

        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        self.socket_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("TCP transport dropped while still connected");
        }
    }
}
