//! Command payload builders
//!
//! Strings inside SACP payloads are length-prefixed: a little-endian `u16`
//! byte count followed by the bytes themselves.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use md5::{Digest, Md5};
use tracing::debug;

use crate::{
    constants::CHUNK_SIZE,
    error::{Error, Result},
};

/// Append a length-prefixed string
pub fn put_string(buf: &mut BytesMut, s: &str) -> Result<()> {
    let len = u16::try_from(s.len()).map_err(|_| Error::StringTooLong(s.len()))?;
    buf.put_u16_le(len);
    buf.put_slice(s.as_bytes());
    Ok(())
}

/// Read a length-prefixed string
///
/// Invalid UTF-8 is replaced rather than rejected; the device only sends
/// ASCII.
pub fn get_string(buf: &mut Bytes) -> Result<String> {
    let len = get_u16(buf)? as usize;
    ensure_remaining(buf, len)?;
    let raw = buf.split_to(len);
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn get_u16(buf: &mut Bytes) -> Result<u16> {
    ensure_remaining(buf, 2)?;
    Ok(buf.get_u16_le())
}

fn get_u32(buf: &mut Bytes) -> Result<u32> {
    ensure_remaining(buf, 4)?;
    Ok(buf.get_u32_le())
}

fn ensure_remaining(buf: &Bytes, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(Error::TruncatedPayload {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

/// Session request payload
///
/// ```text
/// [len][client_name][len][app_id][0x00 0x00]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeRequest {
    /// Name the device shows for this client
    pub client_name: String,

    /// Application identifier
    pub app_id: String,
}

impl HandshakeRequest {
    /// Client name sent by the stock uploader (spelling is what devices see)
    pub const DEFAULT_CLIENT_NAME: &'static str = "Destop";

    /// Application id sent by the stock uploader
    pub const DEFAULT_APP_ID: &'static str = "j1upload";

    pub fn new(client_name: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            app_id: app_id.into(),
        }
    }

    /// Encode to payload bytes
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(6 + self.client_name.len() + self.app_id.len());
        put_string(&mut buf, &self.client_name)?;
        put_string(&mut buf, &self.app_id)?;
        // Reserved
        buf.put_u16_le(0);
        Ok(buf.freeze())
    }

    /// Decode from payload bytes
    pub fn decode(mut payload: Bytes) -> Result<Self> {
        let client_name = get_string(&mut payload)?;
        let app_id = get_string(&mut payload)?;
        get_u16(&mut payload)?;
        Ok(Self { client_name, app_id })
    }
}

impl Default for HandshakeRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CLIENT_NAME, Self::DEFAULT_APP_ID)
    }
}

/// Job-start payload
///
/// ```text
/// [len][filename][total_length: u32][chunk_count: u16][len][md5 hex]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    /// File name shown on the device
    pub filename: String,

    /// Payload size in bytes
    pub total_length: u32,

    /// Number of chunks the device should expect
    pub chunk_count: u16,

    /// Lowercase hex MD5 of the whole payload
    pub digest_hex: String,
}

impl UploadDescriptor {
    /// Describe `data` for upload under `filename`
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the size does not fit the `u32`
    /// length field or the chunk count does not fit `u16`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sacp_core::payload::UploadDescriptor;
    ///
    /// let desc = UploadDescriptor::from_payload("job.gcode", &[0u8; 61440]).unwrap();
    /// assert_eq!(desc.chunk_count, 2);
    /// ```
    pub fn from_payload(filename: impl Into<String>, data: &[u8]) -> Result<Self> {
        let max = u16::MAX as usize * CHUNK_SIZE - 1;
        let too_large = || Error::PayloadTooLarge {
            size: data.len(),
            max,
        };

        let total_length = u32::try_from(data.len()).map_err(|_| too_large())?;
        let chunk_count =
            u16::try_from(Self::chunk_count_for(data.len())).map_err(|_| too_large())?;
        let digest_hex = hex::encode(Md5::digest(data));

        let desc = Self {
            filename: filename.into(),
            total_length,
            chunk_count,
            digest_hex,
        };

        debug!(
            filename = %desc.filename,
            total_length = desc.total_length,
            chunk_count = desc.chunk_count,
            digest = %desc.digest_hex,
            "Built upload descriptor"
        );

        Ok(desc)
    }

    /// Chunk count the device expects for `len` bytes
    ///
    /// Always `len / CHUNK_SIZE + 1`, so an exact multiple of the chunk size
    /// still gets one more chunk. Devices expect this count.
    pub fn chunk_count_for(len: usize) -> usize {
        len / CHUNK_SIZE + 1
    }

    /// Encode to payload bytes
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf =
            BytesMut::with_capacity(10 + self.filename.len() + self.digest_hex.len());
        put_string(&mut buf, &self.filename)?;
        buf.put_u32_le(self.total_length);
        buf.put_u16_le(self.chunk_count);
        put_string(&mut buf, &self.digest_hex)?;
        Ok(buf.freeze())
    }

    /// Decode from payload bytes
    pub fn decode(mut payload: Bytes) -> Result<Self> {
        let filename = get_string(&mut payload)?;
        let total_length = get_u32(&mut payload)?;
        let chunk_count = get_u16(&mut payload)?;
        let digest_hex = get_string(&mut payload)?;

        Ok(Self {
            filename,
            total_length,
            chunk_count,
            digest_hex,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_put_string() {
        let mut buf = BytesMut::new();
        put_string(&mut buf, "abc").unwrap();
        assert_eq!(buf.as_ref(), &[3, 0, b'a', b'b', b'c']);
    }

    #[test]
    fn test_put_string_too_long() {
        let long = "x".repeat(u16::MAX as usize + 1);
        let mut buf = BytesMut::new();
        assert!(matches!(
            put_string(&mut buf, &long),
            Err(Error::StringTooLong(65536))
        ));
    }

    #[test]
    fn test_get_string_truncated() {
        let mut buf = Bytes::from_static(&[5, 0, b'a', b'b']);
        assert!(matches!(
            get_string(&mut buf),
            Err(Error::TruncatedPayload { needed: 5, remaining: 2 })
        ));
    }

    #[test]
    fn test_handshake_default_bytes() {
        let payload = HandshakeRequest::default().encode().unwrap();

        let mut expected = vec![6, 0];
        expected.extend_from_slice(b"Destop");
        expected.extend_from_slice(&[8, 0]);
        expected.extend_from_slice(b"j1upload");
        expected.extend_from_slice(&[0, 0]);

        assert_eq!(payload.as_ref(), expected.as_slice());
        assert_eq!(HandshakeRequest::decode(payload).unwrap(), HandshakeRequest::default());
    }

    #[test]
    fn test_handshake_missing_reserved() {
        let mut payload = BytesMut::new();
        put_string(&mut payload, "a").unwrap();
        put_string(&mut payload, "b").unwrap();

        assert!(HandshakeRequest::decode(payload.freeze()).is_err());
    }

    #[test]
    fn test_chunk_count_rule() {
        assert_eq!(UploadDescriptor::chunk_count_for(0), 1);
        assert_eq!(UploadDescriptor::chunk_count_for(1), 1);
        assert_eq!(UploadDescriptor::chunk_count_for(CHUNK_SIZE - 1), 1);
        assert_eq!(UploadDescriptor::chunk_count_for(CHUNK_SIZE), 2);
        assert_eq!(UploadDescriptor::chunk_count_for(CHUNK_SIZE + 1), 2);
        assert_eq!(UploadDescriptor::chunk_count_for(70000), 2);
        assert_eq!(UploadDescriptor::chunk_count_for(2 * CHUNK_SIZE), 3);
    }

    #[test]
    fn test_descriptor_empty_payload() {
        let desc = UploadDescriptor::from_payload("empty.gcode", &[]).unwrap();

        assert_eq!(desc.total_length, 0);
        assert_eq!(desc.chunk_count, 1);
        assert_eq!(desc.digest_hex, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_descriptor_70000_bytes() {
        let data: Vec<u8> = (0..70000u32).map(|i| (i % 251) as u8).collect();
        let desc = UploadDescriptor::from_payload("job.gcode", &data).unwrap();

        assert_eq!(desc.filename, "job.gcode");
        assert_eq!(desc.total_length, 70000);
        assert_eq!(desc.chunk_count, 2);
        assert_eq!(desc.digest_hex, "83a59980ece79dbb8eaadbea1819fd2b");
    }

    #[test]
    fn test_descriptor_encoding() {
        let desc = UploadDescriptor::from_payload("job.gcode", &[]).unwrap();
        let payload = desc.encode().unwrap();

        assert_eq!(payload.len(), 2 + 9 + 4 + 2 + 2 + 32);
        assert_eq!(&payload[..2], &[9, 0]);
        assert_eq!(&payload[2..11], b"job.gcode");
        assert_eq!(&payload[11..15], &[0, 0, 0, 0]);
        assert_eq!(&payload[15..17], &[1, 0]);
        assert_eq!(&payload[17..19], &[32, 0]);
        assert_eq!(&payload[19..], desc.digest_hex.as_bytes());

        assert_eq!(UploadDescriptor::decode(payload).unwrap(), desc);
    }

    #[test]
    fn test_descriptor_decode_truncated() {
        let payload = UploadDescriptor::from_payload("a", &[1, 2, 3])
            .unwrap()
            .encode()
            .unwrap();

        let result = UploadDescriptor::decode(payload.slice(..payload.len() - 1));
        assert!(matches!(result, Err(Error::TruncatedPayload { .. })));
    }
}
