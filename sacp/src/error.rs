//! High-level error types

use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] sacp_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] sacp_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] sacp_types::Error),

    #[error("Discovery failed: {0}")]
    DiscoveryFailed(#[source] sacp_transport::Error),

    #[error("No matching device answered within {0:?}")]
    NotFound(Duration),

    #[error("Device not connected")]
    NotConnected,
}
