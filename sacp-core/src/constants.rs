//! Protocol constants

/// Frame magic bytes
pub const MAGIC: [u8; 2] = [0xAA, 0x55];

/// Protocol version byte carried at offset 4
pub const VERSION: u8 = 0x01;

/// Bytes before the header checksum that it covers
/// (magic, length, version, receiver id)
pub const HEADER_CHECKSUM_SPAN: usize = 6;

/// Fixed frame prefix: magic, length, version, receiver id, header checksum
pub const PREAMBLE_SIZE: usize = 7;

/// Preamble plus sender id, attribute, sequence, command set and command id
pub const HEADER_SIZE: usize = 13;

/// Trailing frame checksum
pub const CHECKSUM_SIZE: usize = 2;

/// Bytes counted by the length field on top of the payload
/// (6 post-length header bytes plus the trailing checksum)
pub const LENGTH_OVERHEAD: usize = 8;

/// Smallest decodable frame (empty payload still needs its checksum)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE;

/// Upload chunk size, also the largest payload a frame may carry
pub const CHUNK_SIZE: usize = 60 * 1024;

/// Largest frame this client will encode or read
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + CHUNK_SIZE + CHECKSUM_SIZE;

/// Sender id used by this client
pub const CLIENT_SENDER_ID: u8 = 0;

/// Receiver id of the device's main controller
pub const CONTROLLER_RECEIVER_ID: u8 = 2;

/// Sequence number of every frame this client sends
pub const DEFAULT_SEQUENCE: u16 = 1;

/// Network defaults
pub mod net {
    /// UDP port the device listens on for discovery broadcasts
    pub const DISCOVERY_PORT: u16 = 20054;

    /// Discovery request datagram
    pub const DISCOVERY_REQUEST: &[u8] = b"discover";

    /// TCP port of the SACP session endpoint
    pub const SESSION_PORT: u16 = 8888;

    /// Largest discovery reply we accept (default Ethernet MTU)
    pub const MAX_DATAGRAM_SIZE: usize = 1500;

    /// Default discovery timeout (seconds)
    pub const DEFAULT_DISCOVERY_TIMEOUT: u64 = 5;

    /// Default connect / handshake timeout (seconds)
    pub const DEFAULT_TIMEOUT: u64 = 5;

    /// Default write timeout for the job-start frame (seconds)
    pub const DEFAULT_UPLOAD_TIMEOUT: u64 = 10;
}
