//! SACP session client

use std::time::Duration;

use sacp_core::{Command, Packet, UploadDescriptor};
use sacp_transport::{TcpTransport, Transport};
use sacp_types::DeviceInfo;
use tracing::{debug, info, trace, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// SACP session client
///
/// Opens the TCP session, performs the session request handshake and
/// announces upload jobs.
///
/// # Examples
///
/// ```no_run
/// use sacp::{Client, ClientConfig};
///
/// #[tokio::main]
/// async fn main() -> sacp::Result<()> {
///     let mut client = Client::new("192.168.1.50", ClientConfig::default());
///
///     client.connect().await?;
///     client.start_upload("job.gcode", b"G28\n").await?;
///
///     client.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Client {
    transport: Box<dyn Transport>,
    config: ClientConfig,
}

impl Client {
    /// Create a client for the device at `ip` (TCP transport)
    pub fn new(ip: impl Into<String>, config: ClientConfig) -> Self {
        let transport = TcpTransport::new(ip, config.port).with_connect_timeout(config.timeout);
        Self::with_transport(Box::new(transport), config)
    }

    /// Create a client over an existing transport
    pub fn with_transport(transport: Box<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Connect to a discovered device
    pub async fn open(device: &DeviceInfo, config: ClientConfig) -> Result<Self> {
        let mut client = Self::new(device.addr.ip().to_string(), config);
        client.connect().await?;
        Ok(client)
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Connect and request a session
    ///
    /// Returns the device's reply to the session request. Any failure after
    /// the stream is open closes it again.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TCP connection cannot be established
    /// - The request cannot be written before the timeout
    /// - No complete reply arrives before the timeout
    /// - The reply is not a valid frame
    pub async fn connect(&mut self) -> Result<Packet> {
        info!("Connecting to {}...", self.transport.remote_addr());

        self.transport.connect().await?;

        match self.request_session().await {
            Ok(reply) => {
                info!("Session established with {}", self.transport.remote_addr());
                Ok(reply)
            }
            Err(e) => {
                warn!("Session request failed: {}", e);
                if let Err(close_err) = self.transport.disconnect().await {
                    warn!("Failed to close connection: {}", close_err);
                }
                Err(e)
            }
        }
    }

    /// Disconnect from device
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.remote_addr());

        self.transport.disconnect().await?;

        info!("Disconnected");
        Ok(())
    }

    /// Announce an upload job
    ///
    /// Sends the job-start frame describing `data` under `filename`. No file
    /// content is sent and no acknowledgement is awaited.
    pub async fn start_upload(&mut self, filename: &str, data: &[u8]) -> Result<UploadDescriptor> {
        self.ensure_connected()?;

        let descriptor = UploadDescriptor::from_payload(filename, data)?;

        info!(
            "Starting upload of {} ({} bytes, {} chunks)",
            descriptor.filename, descriptor.total_length, descriptor.chunk_count
        );

        let packet = self.create_packet(Command::StartUpload, descriptor.encode()?);
        self.send_packet(&packet, self.config.upload_timeout).await?;

        Ok(descriptor)
    }

    // Helper methods

    async fn request_session(&mut self) -> Result<Packet> {
        let packet = self.create_packet(Command::RequestSession, self.config.handshake.encode()?);
        self.send_packet(&packet, self.config.timeout).await?;

        let reply = self.receive_packet(self.config.timeout).await?;

        debug!("Got reply on session request: {}", reply);

        Ok(reply)
    }

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    fn create_packet(&self, command: Command, payload: bytes::Bytes) -> Packet {
        Packet::with_payload(command, self.config.receiver_id, payload)
    }

    async fn send_packet(&mut self, packet: &Packet, timeout: Duration) -> Result<()> {
        trace!("Sending: {:?}", packet);

        let data = packet.encode()?;
        self.transport.send(&data, timeout).await?;

        Ok(())
    }

    async fn receive_packet(&mut self, timeout: Duration) -> Result<Packet> {
        let buf = self.transport.receive_frame(timeout).await?;

        let packet = Packet::decode(buf)?;

        trace!("Received: {:?}", packet);

        Ok(packet)
    }
}
