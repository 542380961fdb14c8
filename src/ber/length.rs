//! BER length encoding and decoding.
//!
//! Length encoding follows X.690 Section 8.1.3:
//! - Short form: Single byte, bit 8=0, value 0-127
//! - Long form: Initial byte (bit 8=1, bits 7-1=count), followed by length bytes
//! - Indefinite form (0x80): Rejected

use smallvec::SmallVec;

use crate::error::{DecodeErrorKind, Error, Result};

/// Maximum length we'll accept.
///
/// Trap datagrams are at most a few kilobytes; 2MB bounds what a hostile
/// length prefix can make the decoder believe.
pub const MAX_LENGTH: usize = 0x200000; // 2MB

/// Encoded length bytes in wire order.
pub type LengthBytes = SmallVec<[u8; 5]>;

/// Encode a length in wire order.
///
/// Uses short form for lengths below 128, long form otherwise with the
/// fewest big-endian octets that hold the value.
///
/// ```
/// use snmp_trap::ber::encode_length;
///
/// assert_eq!(encode_length(5).as_slice(), &[0x05]);
/// assert_eq!(encode_length(200).as_slice(), &[0x81, 0xC8]);
/// assert_eq!(encode_length(0x1234).as_slice(), &[0x82, 0x12, 0x34]);
/// ```
pub fn encode_length(len: usize) -> LengthBytes {
    let mut out = LengthBytes::new();
    if len < 0x80 {
        out.push(len as u8);
        return out;
    }

    let be = (len as u64).to_be_bytes();
    let skip = be.iter().take_while(|&&b| b == 0).count();
    let octets = &be[skip..];
    out.push(0x80 | octets.len() as u8);
    out.extend_from_slice(octets);
    out
}

/// Number of bytes [`encode_length`] produces for `len`.
pub fn encoded_length_len(len: usize) -> usize {
    if len < 0x80 {
        1
    } else {
        let bits = usize::BITS - len.leading_zeros();
        1 + bits.div_ceil(8) as usize
    }
}

/// Decode a length from bytes, returning (length, bytes_consumed)
///
/// The `base_offset` parameter is used to report error offsets correctly
/// when this is called from within a decoder.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let Some(&first) = data.first() else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };

    if first == 0x80 {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::IndefiniteLength,
        ));
    }

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let num_octets = (first & 0x7F) as usize;

    if num_octets > 4 {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthTooLong { octets: num_octets },
        ));
    }

    let Some(octets) = data.get(1..1 + num_octets) else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };

    let len = octets
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);

    if len > MAX_LENGTH {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthExceedsMax {
                length: len,
                max: MAX_LENGTH,
            },
        ));
    }

    Ok((len, 1 + num_octets))
}
