//! BER (Basic Encoding Rules) codec for SNMP.
//!
//! Only the subset of X.690 that SNMP v1/v2c uses: single-octet tags,
//! definite lengths, and primitive or constructed encodings.

mod decode;
mod encode;
mod length;
pub mod tag;

pub use decode::{Decoder, MAX_DEPTH};
pub use encode::EncodeBuf;
pub use length::{LengthBytes, MAX_LENGTH, decode_length, encode_length, encoded_length_len};

use crate::error::{DecodeErrorKind, Error, Result};

/// A single tag-length-value element borrowed from a larger buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    /// Tag byte.
    pub tag: u8,
    /// Content length from the length field.
    pub length: usize,
    /// Content bytes.
    pub value: &'a [u8],
    /// Offset of the tag byte in the source buffer.
    pub offset: usize,
    /// Bytes taken by the tag and length fields.
    pub header_len: usize,
}

impl Tlv<'_> {
    /// Offset just past this element, where the next sibling starts.
    pub fn end(&self) -> usize {
        self.offset + self.header_len + self.length
    }
}

/// Read the TLV starting at `offset` in `buf`.
///
/// Fails when the buffer ends inside the header or the declared length runs
/// past the end of the buffer.
///
/// ```
/// use snmp_trap::ber::extract_next_tlv;
///
/// let buf = [0x02, 0x01, 0x2A, 0x05, 0x00];
/// let first = extract_next_tlv(&buf, 0).unwrap();
/// assert_eq!((first.tag, first.value), (0x02, &[0x2A][..]));
///
/// let second = extract_next_tlv(&buf, first.end()).unwrap();
/// assert_eq!((second.tag, second.length), (0x05, 0));
///
/// assert!(extract_next_tlv(&[0x04, 0x05, b'a'], 0).is_err());
/// ```
pub fn extract_next_tlv(buf: &[u8], offset: usize) -> Result<Tlv<'_>> {
    let Some(&tag) = buf.get(offset) else {
        return Err(Error::decode(offset, DecodeErrorKind::TruncatedData));
    };
    let (length, consumed) = decode_length(&buf[offset + 1..], offset + 1)?;
    let start = offset + 1 + consumed;
    let Some(value) = buf.get(start..start + length) else {
        return Err(Error::decode(
            start,
            DecodeErrorKind::InsufficientData {
                needed: length,
                available: buf.len() - start,
            },
        ));
    };
    Ok(Tlv {
        tag,
        length,
        value,
        offset,
        header_len: 1 + consumed,
    })
}
