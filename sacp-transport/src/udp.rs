//! UDP broadcast socket for SACP discovery
//!
//! Devices answer a `"discover"` datagram sent to the limited broadcast
//! address on port 20054. Replies arrive as unicast datagrams on the same
//! socket.

use std::net::SocketAddr;

use bytes::BytesMut;
use sacp_core::constants::net::MAX_DATAGRAM_SIZE;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, trace, warn};

use crate::error::*;

/// Broadcast-enabled UDP socket
pub struct UdpBroadcast {
    socket: UdpSocket,
}

impl UdpBroadcast {
    /// Bind to any available local port with broadcast enabled
    pub async fn bind() -> Result<Self> {
        Self::bind_to(SocketAddr::from(([0, 0, 0, 0], 0))).await
    }

    /// Bind to `local` with broadcast enabled
    pub async fn bind_to(local: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(local).await.map_err(Error::Io)?;
        socket.set_broadcast(true).map_err(Error::Io)?;

        debug!("UDP socket bound to {}", socket.local_addr()?);

        Ok(Self { socket })
    }

    /// Local address of the socket
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Send one datagram to `target`
    pub async fn send_to(&self, data: &[u8], target: SocketAddr) -> Result<()> {
        trace!(
            "Sending {} bytes via UDP to {}: {:02X?}",
            data.len(),
            target,
            &data[..data.len().min(32)]
        );

        self.socket.send_to(data, target).await.map_err(Error::Io)?;

        Ok(())
    }

    /// Receive one datagram, failing once `deadline` has passed
    pub async fn recv_from(&self, deadline: Instant) -> Result<(BytesMut, SocketAddr)> {
        let mut buf = BytesMut::zeroed(MAX_DATAGRAM_SIZE);

        let (n, from) = timeout_at(deadline, self.socket.recv_from(&mut buf))
            .await
            .map_err(|_| Error::ReadTimeout)?
            .map_err(|e| {
                warn!("Read error: {}", e);
                Error::Io(e)
            })?;

        // Truncate to actual received size
        buf.truncate(n);

        trace!(
            "Received {} bytes via UDP from {}: {:02X?}",
            n,
            from,
            &buf[..n.min(32)]
        );

        Ok((buf, from))
    }
}
