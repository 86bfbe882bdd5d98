//! SACP frame structure and encoding/decoding

use byteorder::{ByteOrder, LittleEndian};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    command::Command,
    constants::{
        CHECKSUM_SIZE, CHUNK_SIZE, CLIENT_SENDER_ID, DEFAULT_SEQUENCE, HEADER_CHECKSUM_SPAN,
        HEADER_SIZE, LENGTH_OVERHEAD, MAGIC, MIN_FRAME_SIZE, PREAMBLE_SIZE, VERSION,
    },
    error::{Error, Result},
};

/// SACP protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌───────┬────────┬─────────┬──────────┬─────────┬────────┬───────────┬──────────┬─────┬─────┬─────────┬──────────┐
/// │ Magic │ Length │ Version │ Receiver │ HeadSum │ Sender │ Attribute │ Sequence │ Set │ Id  │ Payload │ Checksum │
/// │ AA 55 │ LE u16 │  0x01   │    u8    │  CRC-8  │   u8   │    u8     │  LE u16  │ u8  │ u8  │ N bytes │  LE u16  │
/// └───────┴────────┴─────────┴──────────┴─────────┴────────┴───────────┴──────────┴─────┴─────┴─────────┴──────────┘
///   0..2    2..4      4          5          6         7         8         9..11     11    12    13..     end-2..end
/// ```
///
/// `Length` counts everything after the preamble (`N + 8`). `HeadSum` covers
/// bytes `0..6`; `Checksum` covers bytes `7..end-2`.
///
/// # Examples
///
/// ```
/// use sacp_core::{Command, Packet};
/// use sacp_core::constants::CONTROLLER_RECEIVER_ID;
///
/// let packet = Packet::with_payload(Command::StartUpload, CONTROLLER_RECEIVER_ID, vec![1, 2, 3]);
/// let encoded = packet.encode().unwrap();
///
/// let decoded = Packet::decode(encoded).unwrap();
/// assert_eq!(packet, decoded);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    /// Destination subsystem on the device
    pub receiver_id: u8,

    /// Source identifier
    pub sender_id: u8,

    /// Protocol flag byte
    pub attribute: u8,

    /// Frame sequence number
    pub sequence: u16,

    /// Command set byte
    pub command_set: u8,

    /// Command id byte
    pub command_id: u8,

    /// Command-specific data
    pub payload: Bytes,
}

impl Packet {
    /// Bytes needed to learn a frame's declared length
    pub const LENGTH_PREFIX_SIZE: usize = 4;

    /// Maximum payload size
    pub const MAX_PAYLOAD_SIZE: usize = CHUNK_SIZE;

    /// Create a client frame with empty payload
    ///
    /// Sender id, attribute and sequence take this client's fixed values.
    pub fn new(command: Command, receiver_id: u8) -> Self {
        Self::with_payload(command, receiver_id, Bytes::new())
    }

    /// Create a client frame with payload
    pub fn with_payload(command: Command, receiver_id: u8, payload: impl Into<Bytes>) -> Self {
        let (command_set, command_id) = command.parts();

        Self {
            receiver_id,
            sender_id: CLIENT_SENDER_ID,
            attribute: 0,
            sequence: DEFAULT_SEQUENCE,
            command_set,
            command_id,
            payload: payload.into(),
        }
    }

    /// Resolve the command pair to a known [`Command`]
    pub fn command(&self) -> Result<Command> {
        Command::try_from((self.command_set, self.command_id))
    }

    /// Read the declared length from the first four bytes of a frame
    ///
    /// Returns `None` if fewer than four bytes are given. The value is not
    /// validated; [`Packet::decode`] does that once the whole frame is in.
    pub fn declared_length(prefix: &[u8]) -> Option<usize> {
        if prefix.len() < Self::LENGTH_PREFIX_SIZE {
            return None;
        }
        Some(LittleEndian::read_u16(&prefix[2..4]) as usize)
    }

    /// Encode frame to bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload exceeds
    /// [`Packet::MAX_PAYLOAD_SIZE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sacp_core::{Command, Packet};
    ///
    /// let packet = Packet::new(Command::RequestSession, 2);
    /// let bytes = packet.encode().unwrap();
    /// assert_eq!(bytes.len(), 15); // Header and checksum only
    /// ```
    pub fn encode(&self) -> Result<BytesMut> {
        if self.payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: self.payload.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }

        let mut buf = BytesMut::with_capacity(self.size());

        // Preamble
        buf.put_slice(&MAGIC);
        buf.put_u16_le((self.payload.len() + LENGTH_OVERHEAD) as u16);
        buf.put_u8(VERSION);
        buf.put_u8(self.receiver_id);
        let head = checksum::header(&buf[..HEADER_CHECKSUM_SPAN]);
        buf.put_u8(head);

        // Header
        buf.put_u8(self.sender_id);
        buf.put_u8(self.attribute);
        buf.put_u16_le(self.sequence);
        buf.put_u8(self.command_set);
        buf.put_u8(self.command_id);

        buf.put_slice(&self.payload);

        let sum = checksum::frame(&buf[PREAMBLE_SIZE..]);
        buf.put_u16_le(sum);

        Ok(buf)
    }

    /// Decode frame from bytes
    ///
    /// The buffer must hold exactly one frame.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`Error::FrameTooShort`]: fewer than 13 bytes
    /// - [`Error::NotASacpFrame`]: magic is not `AA 55`
    /// - [`Error::LengthMismatch`]: declared length != bytes after preamble,
    ///   or smaller than the header and checksum it must cover
    /// - [`Error::VersionMismatch`]: version byte is not 1
    /// - [`Error::HeaderChecksumMismatch`]: CRC-8 over bytes `0..6` differs
    /// - [`Error::ChecksumMismatch`]: trailing checksum differs
    pub fn decode(buf: BytesMut) -> Result<Self> {
        let len = buf.len();

        if len < MIN_FRAME_SIZE {
            return Err(Error::FrameTooShort {
                expected: MIN_FRAME_SIZE,
                actual: len,
            });
        }

        if buf[..2] != MAGIC {
            return Err(Error::NotASacpFrame([buf[0], buf[1]]));
        }

        // A length below the fixed overhead leaves no room for the checksum
        let declared = LittleEndian::read_u16(&buf[2..4]) as usize;
        if declared < LENGTH_OVERHEAD || declared != len - PREAMBLE_SIZE {
            return Err(Error::LengthMismatch {
                declared,
                actual: len - PREAMBLE_SIZE,
            });
        }

        if buf[4] != VERSION {
            return Err(Error::VersionMismatch {
                expected: VERSION,
                actual: buf[4],
            });
        }

        let head = checksum::header(&buf[..HEADER_CHECKSUM_SPAN]);
        if head != buf[HEADER_CHECKSUM_SPAN] {
            return Err(Error::HeaderChecksumMismatch {
                expected: head,
                received: buf[HEADER_CHECKSUM_SPAN],
            });
        }

        let body_end = len - CHECKSUM_SIZE;
        let received = LittleEndian::read_u16(&buf[body_end..]);
        let calculated = checksum::frame(&buf[PREAMBLE_SIZE..body_end]);
        if calculated != received {
            return Err(Error::ChecksumMismatch {
                expected: calculated,
                received,
            });
        }

        let buf = buf.freeze();

        Ok(Self {
            receiver_id: buf[5],
            sender_id: buf[7],
            attribute: buf[8],
            sequence: LittleEndian::read_u16(&buf[9..11]),
            command_set: buf[11],
            command_id: buf[12],
            payload: buf.slice(HEADER_SIZE..body_end),
        })
    }

    /// Get total encoded size
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + CHECKSUM_SIZE
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("receiver_id", &self.receiver_id)
            .field("sender_id", &self.sender_id)
            .field("attribute", &format!("0x{:02X}", self.attribute))
            .field("sequence", &self.sequence)
            .field("command_set", &format!("0x{:02X}", self.command_set))
            .field("command_id", &format!("0x{:02X}", self.command_id))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command() {
            Ok(command) => write!(f, "Packet[{}]", command)?,
            Err(_) => write!(f, "Packet[0x{:02X}/0x{:02X}]", self.command_set, self.command_id)?,
        }
        write!(
            f,
            "(to={}, from={}, seq={}, len={})",
            self.receiver_id,
            self.sender_id,
            self.sequence,
            self.payload.len()
        )
    }
}
