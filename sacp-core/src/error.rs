//! Error types for sacp-core



/// Result type alias for sacp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to be valid
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// Magic bytes are not 0xAA 0x55
    #[error("Not a SACP frame: magic {0:02X?}")]
    NotASacpFrame([u8; 2]),

    /// Declared length disagrees with the bytes after the preamble
    #[error("Frame length mismatch: header declares {declared} bytes, {actual} available")]
    LengthMismatch {
        declared: usize,
        actual: usize,
    },

    /// Unsupported protocol version
    #[error("SACP version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        expected: u8,
        actual: u8,
    },

    /// Header checksum verification failed
    #[error("Header checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    HeaderChecksumMismatch {
        expected: u8,
        received: u8,
    },

    /// Frame checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// Unknown command set / id pair
    #[error("Unknown command: set 0x{set:02X}, id 0x{id:02X}")]
    UnknownCommand {
        set: u8,
        id: u8,
    },

    /// Payload too large
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// String does not fit its 16-bit length prefix
    #[error("String too long for length prefix: {0} bytes")]
    StringTooLong(usize),

    /// Command payload ended before all fields were read
    #[error("Truncated payload: needed {needed} more bytes, {remaining} left")]
    TruncatedPayload {
        needed: usize,
        remaining: usize,
    },
}

impl Error {
    /// Check if error comes from a failed integrity check
    pub fn is_checksum_error(&self) -> bool {
        matches!(
            self,
            Self::HeaderChecksumMismatch { .. } | Self::ChecksumMismatch { .. }
        )
    }

    /// Check if error means the bytes were not a well-formed frame
    pub fn is_framing_error(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. }
                | Self::NotASacpFrame(_)
                | Self::LengthMismatch { .. }
                | Self::VersionMismatch { .. }
        )
    }
}
