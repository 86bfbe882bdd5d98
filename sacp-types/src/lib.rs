//! Type definitions for sacp

pub mod device_info;
pub mod error;

pub use device_info::{DeviceInfo, DeviceSignature, SUPPORTED_MODEL, SUPPORTED_PROTOCOL_VERSION};
pub use error::{Error, Result};
