//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Connection timeout")]
    ConnectionTimeout,

    #[error("Write timeout")]
    WriteTimeout,

    #[error("Read timeout")]
    ReadTimeout,

    #[error("Connection closed by remote")]
    ConnectionClosed,

    #[error("Frame too large: declared {declared} bytes (max: {max} bytes)")]
    FrameTooLarge { declared: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Check if error is a deadline expiry
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout | Self::WriteTimeout | Self::ReadTimeout
        )
    }
}
