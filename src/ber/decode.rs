//! BER decoding.
//!
//! Zero-copy decoding using `Bytes` to avoid allocations.

use bytes::Bytes;

use super::length::decode_length;
use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;

/// Deepest constructed nesting accepted, counting the message itself.
///
/// A trap message uses four levels before any varbind value; the rest is
/// room for nested SEQUENCE values.
pub const MAX_DEPTH: usize = 32;

/// BER decoder that reads from a byte buffer.
///
/// Sub-decoders created by [`read_sequence`](Self::read_sequence) and
/// friends keep reporting offsets relative to the outermost buffer, so an
/// error deep inside a PDU points at the byte in the original datagram.
#[derive(Debug, Clone)]
pub struct Decoder {
    data: Bytes,
    offset: usize,
    base: usize,
    depth: usize,
}

impl Decoder {
    /// Create a new decoder from bytes.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            offset: 0,
            base: 0,
            depth: 0,
        }
    }

    /// Create a decoder from a byte slice (copies the data).
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Get the current offset from the start of the outermost buffer.
    pub fn offset(&self) -> usize {
        self.base + self.offset
    }

    /// Number of constructed encodings enclosing this decoder.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Get remaining bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Check if we've reached the end.
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Peek at the next tag without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    fn error(&self, kind: DecodeErrorKind) -> Box<Error> {
        Error::decode(self.offset(), kind)
    }

    /// Read a tag byte.
    pub fn read_tag(&mut self) -> Result<u8> {
        let tag = self
            .peek_tag()
            .ok_or_else(|| self.error(DecodeErrorKind::TruncatedData))?;
        self.offset += 1;
        Ok(tag)
    }

    /// Read a length.
    pub fn read_length(&mut self) -> Result<usize> {
        let (len, consumed) = decode_length(&self.data[self.offset..], self.offset())?;
        self.offset += consumed;
        Ok(len)
    }

    /// Read raw bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        // saturating_add so a huge len cannot wrap past the bounds check
        if self.offset.saturating_add(len) > self.data.len() {
            return Err(self.error(DecodeErrorKind::InsufficientData {
                needed: len,
                available: self.remaining(),
            }));
        }
        let bytes = self.data.slice(self.offset..self.offset + len);
        self.offset += len;
        Ok(bytes)
    }

    /// Read and expect a specific tag, returning the content length.
    pub fn expect_tag(&mut self, expected: u8) -> Result<usize> {
        let at = self.offset();
        let tag = self.read_tag()?;
        if tag != expected {
            return Err(Error::decode(
                at,
                DecodeErrorKind::UnexpectedTag {
                    expected,
                    actual: tag,
                },
            ));
        }
        self.read_length()
    }

    /// Read a BER INTEGER.
    pub fn read_integer(&mut self) -> Result<i64> {
        let len = self.expect_tag(tag::universal::INTEGER)?;
        self.read_integer_value(len)
    }

    /// Read an INTEGER that must fit in 32 bits (request-id, error fields).
    pub fn read_integer32(&mut self) -> Result<i32> {
        let at = self.offset();
        let value = self.read_integer()?;
        i32::try_from(value).map_err(|_| {
            Error::decode(at, DecodeErrorKind::IntegerOverflow { length: 8 })
        })
    }

    /// Read signed integer content given the length.
    ///
    /// Non-minimal encodings are accepted. More than eight content octets
    /// cannot be represented and are rejected.
    pub fn read_integer_value(&mut self, len: usize) -> Result<i64> {
        if len == 0 {
            return Err(self.error(DecodeErrorKind::ZeroLengthInteger));
        }
        if len > 8 {
            return Err(self.error(DecodeErrorKind::IntegerOverflow { length: len }));
        }

        let bytes = self.read_bytes(len)?;
        let negative = bytes[0] & 0x80 != 0;
        let init: i64 = if negative { -1 } else { 0 };
        Ok(bytes
            .iter()
            .fold(init, |acc, &byte| (acc << 8) | i64::from(byte)))
    }

    /// Read an unsigned 32-bit integer with specific tag.
    pub fn read_unsigned32(&mut self, expected_tag: u8) -> Result<u32> {
        let len = self.expect_tag(expected_tag)?;
        self.read_unsigned32_value(len)
    }

    /// Read unsigned 32-bit content given the length.
    pub fn read_unsigned32_value(&mut self, len: usize) -> Result<u32> {
        let at = self.offset();
        let value = self.read_unsigned64_value(len)?;
        u32::try_from(value)
            .map_err(|_| Error::decode(at, DecodeErrorKind::IntegerOverflow { length: len }))
    }

    /// Read an unsigned 64-bit integer with specific tag.
    pub fn read_unsigned64(&mut self, expected_tag: u8) -> Result<u64> {
        let len = self.expect_tag(expected_tag)?;
        self.read_unsigned64_value(len)
    }

    /// Read unsigned 64-bit content given the length.
    pub fn read_unsigned64_value(&mut self, len: usize) -> Result<u64> {
        if len == 0 {
            return Err(self.error(DecodeErrorKind::ZeroLengthInteger));
        }
        let at = self.offset();
        let bytes = self.read_bytes(len)?;

        // Leading zero octets carry no value; anything left must fit in 8 bytes.
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        let significant = &bytes[skip..];
        if significant.len() > 8 {
            return Err(Error::decode(
                at,
                DecodeErrorKind::IntegerOverflow { length: len },
            ));
        }

        Ok(significant
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)))
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        if self.peek_tag() == Some(tag::universal::OCTET_STRING_CONSTRUCTED) {
            return Err(self.error(DecodeErrorKind::ConstructedOctetString));
        }
        let len = self.expect_tag(tag::universal::OCTET_STRING)?;
        self.read_bytes(len)
    }

    /// Read a NULL.
    pub fn read_null(&mut self) -> Result<()> {
        let len = self.expect_tag(tag::universal::NULL)?;
        self.check_null_length(len)
    }

    pub(crate) fn check_null_length(&self, len: usize) -> Result<()> {
        if len != 0 {
            return Err(self.error(DecodeErrorKind::InvalidNull));
        }
        Ok(())
    }

    /// Read an OBJECT IDENTIFIER.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        self.read_oid_value(len)
    }

    /// Read an OID given a pre-read length.
    pub fn read_oid_value(&mut self, len: usize) -> Result<Oid> {
        let at = self.offset();
        let bytes = self.read_bytes(len)?;
        Oid::from_ber(&bytes).map_err(|e| match *e {
            Error::Decode { offset, kind } => Error::decode(at + offset, kind),
            _ => e,
        })
    }

    /// Read an IP address.
    pub fn read_ip_address(&mut self) -> Result<[u8; 4]> {
        let len = self.expect_tag(tag::application::IP_ADDRESS)?;
        self.read_ip_address_value(len)
    }

    /// Read IpAddress content given the length.
    pub fn read_ip_address_value(&mut self, len: usize) -> Result<[u8; 4]> {
        if len != 4 {
            return Err(self.error(DecodeErrorKind::InvalidIpAddressLength { length: len }));
        }
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Read a SEQUENCE, returning a decoder for its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.read_constructed(tag::universal::SEQUENCE)
    }

    /// Read a constructed type with a specific tag, returning a decoder for its contents.
    pub fn read_constructed(&mut self, expected_tag: u8) -> Result<Decoder> {
        let len = self.expect_tag(expected_tag)?;
        self.sub_decoder(len)
    }

    /// Create a sub-decoder for the next `len` bytes.
    ///
    /// Fails with [`DecodeErrorKind::NestingTooDeep`] once the sub-decoder
    /// would sit more than [`MAX_DEPTH`] levels down.
    pub fn sub_decoder(&mut self, len: usize) -> Result<Decoder> {
        let base = self.offset();
        let depth = self.depth + 1;
        if depth > MAX_DEPTH {
            return Err(self.error(DecodeErrorKind::NestingTooDeep { max: MAX_DEPTH }));
        }
        let content = self.read_bytes(len)?;
        Ok(Decoder {
            data: content,
            offset: 0,
            base,
            depth,
        })
    }

    /// Fail unless every byte has been consumed.
    pub fn expect_end(&self) -> Result<()> {
        if !self.is_empty() {
            return Err(self.error(DecodeErrorKind::TrailingData {
                count: self.remaining(),
            }));
        }
        Ok(())
    }

    /// Get remaining data as a slice.
    pub fn remaining_slice(&self) -> &[u8] {
        &self.data[self.offset..]
    }
}
