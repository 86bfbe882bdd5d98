//! Device discovery over UDP broadcast

use sacp_core::constants::net::DISCOVERY_REQUEST;
use sacp_transport::UdpBroadcast;
use sacp_types::DeviceInfo;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::DiscoveryConfig;
use crate::error::{Error, Result};

/// Broadcast discovery
///
/// # Examples
///
/// ```no_run
/// use sacp::{Discovery, DiscoveryConfig};
///
/// #[tokio::main]
/// async fn main() -> sacp::Result<()> {
///     let device = Discovery::new(DiscoveryConfig::default()).discover().await?;
///     println!("Found {}", device);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    config: DiscoveryConfig,
}

impl Discovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Find the first device matching the configured signature
    ///
    /// Sends one `"discover"` datagram and reads replies until a match or
    /// the deadline. Malformed and non-matching replies are logged and
    /// skipped. The request is never resent.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the deadline passes without a match
    /// - [`Error::DiscoveryFailed`] on any socket error
    pub async fn discover(&self) -> Result<DeviceInfo> {
        let socket = UdpBroadcast::bind().await.map_err(Error::DiscoveryFailed)?;
        let deadline = Instant::now() + self.config.timeout;

        info!("Discovering devices via {}...", self.config.target);

        socket
            .send_to(DISCOVERY_REQUEST, self.config.target)
            .await
            .map_err(Error::DiscoveryFailed)?;

        loop {
            let (datagram, from) = match socket.recv_from(deadline).await {
                Ok(received) => received,
                Err(sacp_transport::Error::ReadTimeout) => {
                    warn!("No matching device within {:?}", self.config.timeout);
                    return Err(Error::NotFound(self.config.timeout));
                }
                Err(e) => return Err(Error::DiscoveryFailed(e)),
            };

            let text = String::from_utf8_lossy(&datagram);

            let device = match DeviceInfo::parse(&text, from) {
                Ok(device) => device,
                Err(e) => {
                    warn!("Unknown discovery reply from {}: {:?} ({})", from, text, e);
                    continue;
                }
            };

            if !device.matches(&self.config.signature) {
                warn!("Unsupported device found: {:?} at {}", text, from.ip());
                continue;
            }

            info!("Device found: {}", device.name);
            debug!("{}", device);

            return Ok(device);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::net::UdpSocket;

    /// Answer the first request with `replies`, in order
    async fn responder(replies: Vec<&'static str>) -> SocketAddr {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (n, from) = socket.recv_from(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b"discover");

            for reply in replies {
                socket.send_to(reply.as_bytes(), from).await.unwrap();
            }
        });

        addr
    }

    fn config(target: SocketAddr) -> DiscoveryConfig {
        DiscoveryConfig::default()
            .with_target(target)
            .with_timeout(Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_discover_match() {
        let target = responder(vec!["Printer1|model:Snapmaker J1|SACP:1"]).await;

        let device = Discovery::new(config(target)).discover().await.unwrap();

        assert_eq!(device.name, "Printer1");
        assert_eq!(device.addr, target);
    }

    #[tokio::test]
    async fn test_discover_skips_bad_replies() {
        let target = responder(vec![
            "Printer1|model:Snapmaker J1",
            "Printer1|model:Other|SACP:1",
            "a|model:Snapmaker J1|SACP:1|d",
            "Printer2|model:Snapmaker J1|SACP:1",
        ])
        .await;

        let device = Discovery::new(config(target)).discover().await.unwrap();

        assert_eq!(device.name, "Printer2");
    }

    #[tokio::test]
    async fn test_discover_only_mismatches() {
        let target = responder(vec!["Printer1|model:Other|SACP:1"]).await;

        let config = config(target).with_timeout(Duration::from_millis(200));
        let result = Discovery::new(config).discover().await;

        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_discover_silence() {
        // Bound but never answers
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = silent.local_addr().unwrap();

        let config = config(target).with_timeout(Duration::from_millis(100));
        let result = Discovery::new(config).discover().await;

        assert!(matches!(result, Err(Error::NotFound(d)) if d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_discover_custom_signature() {
        let target = responder(vec![
            "J1|model:Snapmaker J1|SACP:1",
            "A350|model:Snapmaker A350|SACP:1",
        ])
        .await;

        let config = config(target)
            .with_signature(sacp_types::DeviceSignature::new("Snapmaker A350", "1"));
        let device = Discovery::new(config).discover().await.unwrap();

        assert_eq!(device.name, "A350");
    }
}
