//! Discovery response structures

use std::fmt;
use std::net::SocketAddr;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

const MODEL_PREFIX: &str = "model:";
const PROTOCOL_PREFIX: &str = "SACP:";

/// Model string of a supported device
pub const SUPPORTED_MODEL: &str = "Snapmaker J1";

/// SACP version string of a supported device
pub const SUPPORTED_PROTOCOL_VERSION: &str = "1";

/// Device information from a discovery reply
///
/// A reply is one datagram of the form
/// `<name>|model:<model>|SACP:<version>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device name (user-assigned)
    pub name: String,

    /// Device model
    pub model: String,

    /// SACP protocol version
    pub protocol_version: String,

    /// Address the reply came from
    pub addr: SocketAddr,

    /// When the reply was received
    pub discovered_at: DateTime<Utc>,
}

impl DeviceInfo {
    /// Parse a discovery reply
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] unless the text has exactly three `|`
    /// separated fields with the `model:` and `SACP:` prefixes.
    ///
    /// # Examples
    ///
    /// ```
    /// use sacp_types::DeviceInfo;
    ///
    /// let addr = "192.168.1.50:20054".parse().unwrap();
    /// let info = DeviceInfo::parse("J1|model:Snapmaker J1|SACP:1", addr).unwrap();
    /// assert_eq!(info.model, "Snapmaker J1");
    /// ```
    pub fn parse(text: &str, addr: SocketAddr) -> Result<Self> {
        let fields: Vec<&str> = text.split('|').collect();

        let &[name, model, protocol] = fields.as_slice() else {
            return Err(Error::Parse(format!(
                "expected 3 fields, got {}",
                fields.len()
            )));
        };

        let model = model
            .strip_prefix(MODEL_PREFIX)
            .ok_or_else(|| Error::Parse(format!("missing '{}' prefix: {}", MODEL_PREFIX, model)))?;
        let protocol_version = protocol.strip_prefix(PROTOCOL_PREFIX).ok_or_else(|| {
            Error::Parse(format!("missing '{}' prefix: {}", PROTOCOL_PREFIX, protocol))
        })?;

        Ok(Self {
            name: name.to_string(),
            model: model.to_string(),
            protocol_version: protocol_version.to_string(),
            addr,
            discovered_at: Utc::now(),
        })
    }

    /// Check the reply against an expected signature
    pub fn matches(&self, signature: &DeviceSignature) -> bool {
        self.model == signature.model && self.protocol_version == signature.protocol_version
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device[{}, model: {}, SACP: {}, at {}]",
            self.name,
            self.model,
            self.protocol_version,
            self.addr.ip()
        )
    }
}

/// Model / protocol version pair a device must report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSignature {
    pub model: String,
    pub protocol_version: String,
}

impl DeviceSignature {
    pub fn new(model: impl Into<String>, protocol_version: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            protocol_version: protocol_version.into(),
        }
    }
}

impl Default for DeviceSignature {
    fn default() -> Self {
        Self::new(SUPPORTED_MODEL, SUPPORTED_PROTOCOL_VERSION)
    }
}
