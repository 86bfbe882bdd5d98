//! # sacp
//!
//! Rust implementation of the Snapmaker SACP job upload protocol.
//!
//! ## Features
//!
//! - Byte-exact SACP frame codec with both checksums
//! - UDP broadcast discovery with device signature filtering
//! - Async/await API using Tokio, deadline-based timeouts
//! - Comprehensive error handling
//!
//! ## Quick Start
//!
//! ```no_run
//! use sacp::{Client, ClientConfig, Discovery, DiscoveryConfig};
//!
//! #[tokio::main]
//! async fn main() -> sacp::Result<()> {
//!     // Find the printer
//!     let device = Discovery::new(DiscoveryConfig::default()).discover().await?;
//!
//!     // Open a session
//!     let mut client = Client::open(&device, ClientConfig::default()).await?;
//!
//!     // Announce the job
//!     client.start_upload("job.gcode", b"G28\n").await?;
//!
//!     // Disconnect
//!     client.disconnect().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;

// Re-exports
pub use client::Client;
pub use config::{ClientConfig, DiscoveryConfig};
pub use discovery::Discovery;
pub use error::{Error, Result};

// Re-export types
pub use sacp_core::{Command, HandshakeRequest, Packet, UploadDescriptor};
pub use sacp_types::{DeviceInfo, DeviceSignature};
