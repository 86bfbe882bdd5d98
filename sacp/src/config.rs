//! Client and discovery configuration

use std::net::SocketAddr;
use std::time::Duration;

use sacp_core::constants::{net, CONTROLLER_RECEIVER_ID};
use sacp_core::HandshakeRequest;
use sacp_types::DeviceSignature;

/// Discovery settings
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Where the `"discover"` datagram is sent
    pub target: SocketAddr,

    /// How long to wait for a matching reply
    pub timeout: Duration,

    /// Model / version a device must report
    pub signature: DeviceSignature,
}

impl DiscoveryConfig {
    /// Send the request to `target` instead of the limited broadcast address
    pub fn with_target(mut self, target: SocketAddr) -> Self {
        self.target = target;
        self
    }

    /// Set discovery timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept a different device signature
    pub fn with_signature(mut self, signature: DeviceSignature) -> Self {
        self.signature = signature;
        self
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            target: SocketAddr::from(([255, 255, 255, 255], net::DISCOVERY_PORT)),
            timeout: Duration::from_secs(net::DEFAULT_DISCOVERY_TIMEOUT),
            signature: DeviceSignature::default(),
        }
    }
}

/// Session client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Session TCP port
    pub port: u16,

    /// Receiver id frames are addressed to
    pub receiver_id: u8,

    /// Connect, handshake write and handshake read timeout
    pub timeout: Duration,

    /// Write timeout for the job-start frame
    pub upload_timeout: Duration,

    /// Identity sent in the session request
    pub handshake: HandshakeRequest,
}

impl ClientConfig {
    /// Set session port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set connect / handshake timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set job-start write timeout
    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    /// Set client identity
    pub fn with_handshake(mut self, handshake: HandshakeRequest) -> Self {
        self.handshake = handshake;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            port: net::SESSION_PORT,
            receiver_id: CONTROLLER_RECEIVER_ID,
            timeout: Duration::from_secs(net::DEFAULT_TIMEOUT),
            upload_timeout: Duration::from_secs(net::DEFAULT_UPLOAD_TIMEOUT),
            handshake: HandshakeRequest::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_discovery_defaults() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.target.to_string(), "255.255.255.255:20054");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.signature.model, "Snapmaker J1");
        assert_eq!(config.signature.protocol_version, "1");
    }

    #[test]
    fn test_client_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.port, 8888);
        assert_eq!(config.receiver_id, 2);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.upload_timeout, Duration::from_secs(10));
        assert_eq!(config.handshake.client_name, "Destop");
        assert_eq!(config.handshake.app_id, "j1upload");
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_port(9999)
            .with_timeout(Duration::from_millis(250))
            .with_upload_timeout(Duration::from_secs(1))
            .with_handshake(HandshakeRequest::new("Bench", "tester"));

        assert_eq!(config.port, 9999);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.upload_timeout, Duration::from_secs(1));
        assert_eq!(config.handshake.app_id, "tester");
    }
}
