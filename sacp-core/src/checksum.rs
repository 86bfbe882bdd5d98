//! SACP checksum algorithms
//!
//! Every frame carries two checksums:
//! 1. A CRC-8 (polynomial 0x07) over the first six bytes, stored at offset 6.
//!    It lets a receiver reject a corrupt preamble before it trusts the
//!    declared length.
//! 2. A 16-bit ones-complement sum over everything between the preamble and
//!    the trailing checksum field (sender id through end of payload).

use tracing::trace;

/// CRC-8 generator polynomial (x^8 + x^2 + x + 1, top bit implicit)
pub const HEADER_POLY: u8 = 0x07;

/// Calculate the header checksum
///
/// # Algorithm
///
/// ```text
/// crc = 0
/// for each bit of input, MSB first:
///     top = crc bit 7
///     crc = crc << 1
///     if top != bit: crc ^= 0x07
/// ```
///
/// No reflection and no final XOR. Frames pass exactly
/// [`HEADER_CHECKSUM_SPAN`](crate::constants::HEADER_CHECKSUM_SPAN) bytes.
///
/// # Examples
///
/// ```
/// use sacp_core::checksum;
///
/// let crc = checksum::header(&[0xAA, 0x55, 0x08, 0x00, 0x01, 0x02]);
/// assert_eq!(crc, 0x76);
/// ```
pub fn header(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;

    for &byte in data {
        for shift in (0..8).rev() {
            let bit = (byte >> shift) & 1 == 1;
            let top = crc & 0x80 != 0;

            crc <<= 1;
            if top != bit {
                crc ^= HEADER_POLY;
            }
        }
    }

    crc
}

/// Calculate the frame checksum
///
/// # Algorithm
///
/// ```text
/// 1. Sum big-endian 16-bit words into a 32-bit accumulator (wrapping)
/// 2. Odd length: add the last byte on its own
/// 3. While sum > 0xFFFF: sum = (sum >> 16) + (sum & 0xFFFF)
/// 4. Return !sum as u16
/// ```
///
/// # Examples
///
/// ```
/// use sacp_core::checksum;
///
/// assert_eq!(checksum::frame(&[]), 0xFFFF);
/// assert_eq!(checksum::frame(&[0x12, 0x34, 0x56, 0x78]), 0x9753);
/// ```
pub fn frame(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    let mut words = data.chunks_exact(2);
    for word in &mut words {
        sum = sum.wrapping_add(u16::from_be_bytes([word[0], word[1]]) as u32);
    }

    if let [last] = words.remainder() {
        sum = sum.wrapping_add(*last as u32);
    }

    while sum > 0xFFFF {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }

    let checksum = !(sum as u16);

    trace!(
        len = data.len(),
        checksum = format!("0x{:04X}", checksum),
        "Calculated frame checksum"
    );

    checksum
}

/// Verify header checksum
pub fn verify_header(data: &[u8], expected: u8) -> bool {
    header(data) == expected
}

/// Verify frame checksum
pub fn verify_frame(data: &[u8], expected: u16) -> bool {
    frame(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    // Preamble of an empty-payload frame addressed to receiver 2
    const PREAMBLE: [u8; 6] = [0xAA, 0x55, 0x08, 0x00, 0x01, 0x02];

    // Sender id through payload of the default handshake frame
    const HANDSHAKE_BODY: [u8; 26] = [
        0x00, 0x00, 0x01, 0x00, 0x01, 0x05, 0x06, 0x00, b'D', b'e', b's', b't', b'o', b'p',
        0x08, 0x00, b'j', b'1', b'u', b'p', b'l', b'o', b'a', b'd', 0x00, 0x00,
    ];

    #[test]
    fn test_header_known_vectors() {
        assert_eq!(header(&PREAMBLE), 0x76);
        assert_eq!(header(&[0; 6]), 0x00);
        assert_eq!(header(&[0x01]), 0x07);
        assert_eq!(header(&[0x80]), 0x89);
        assert_eq!(header(&[0xAA, 0x55, 0x1C, 0x00, 0x01, 0x02]), 0x49);
    }

    #[test]
    fn test_header_empty() {
        assert_eq!(header(&[]), 0);
    }

    #[test]
    fn test_header_deterministic() {
        assert_eq!(header(&PREAMBLE), header(&PREAMBLE));
    }

    #[test]
    fn test_header_detects_single_bit_flips() {
        let reference = header(&PREAMBLE);

        for i in 0..PREAMBLE.len() {
            for bit in 0..8 {
                let mut corrupted = PREAMBLE;
                corrupted[i] ^= 1 << bit;
                assert_ne!(header(&corrupted), reference, "byte {} bit {}", i, bit);
            }
        }
    }

    #[test]
    fn test_frame_known_vectors() {
        assert_eq!(frame(&[]), 0xFFFF);
        assert_eq!(frame(&[0x12, 0x34, 0x56, 0x78]), 0x9753);
        assert_eq!(frame(&[0xFF; 4]), 0x0000);
        assert_eq!(frame(&HANDSHAKE_BODY), 0x1B3B);
    }

    #[test]
    fn test_frame_odd_length() {
        // Trailing byte is added as a low value, not shifted into the high byte
        assert_eq!(frame(&[1, 2, 3]), 0xFEFA);
    }

    #[test]
    fn test_frame_detects_single_bit_flips() {
        let reference = frame(&HANDSHAKE_BODY);

        for i in 0..HANDSHAKE_BODY.len() {
            for bit in 0..8 {
                let mut corrupted = HANDSHAKE_BODY;
                corrupted[i] ^= 1 << bit;
                assert_ne!(frame(&corrupted), reference, "byte {} bit {}", i, bit);
            }
        }
    }

    #[test]
    fn test_frame_large_input() {
        let data = vec![0xFF; 61446];
        assert_eq!(frame(&data), frame(&data));
    }

    #[test]
    fn test_verify() {
        assert!(verify_header(&PREAMBLE, 0x76));
        assert!(!verify_header(&PREAMBLE, 0x77));
        assert!(verify_frame(&HANDSHAKE_BODY, 0x1B3B));
        assert!(!verify_frame(&HANDSHAKE_BODY, 0x1B3C));
    }
}
