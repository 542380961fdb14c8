//! BER encoding.
//!
//! [`EncodeBuf`] builds a message back to front: content is written first,
//! then its length and tag are prepended once the content size is known.
//! This avoids measuring every nested SEQUENCE twice. Callers therefore push
//! the fields of a constructed value in reverse order.

use bytes::Bytes;

use super::length::encode_length;
use super::tag;
use crate::oid::Oid;

/// Reverse-order BER encode buffer.
#[derive(Debug, Default)]
pub struct EncodeBuf {
    // Bytes are stored reversed; `finish` flips them.
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes encoded so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been encoded.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Prepend raw bytes, preserving their order in the final output.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buf.extend(data.iter().rev());
    }

    /// Prepend a tag byte.
    pub fn push_tag(&mut self, tag: u8) {
        self.buf.push(tag);
    }

    /// Prepend a BER length.
    pub fn push_length(&mut self, len: usize) {
        self.push_bytes(&encode_length(len));
    }

    /// Prepend a primitive TLV with the given tag and content.
    pub fn push_primitive(&mut self, tag: u8, content: &[u8]) {
        self.push_bytes(content);
        self.push_length(content.len());
        self.push_tag(tag);
    }

    /// Prepend a constructed TLV whose content is written by `f`.
    ///
    /// Inside `f`, push children last-to-first.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let start = self.buf.len();
        f(self);
        let content_len = self.buf.len() - start;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Prepend a SEQUENCE whose content is written by `f`.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Prepend an INTEGER using the fewest two's-complement octets.
    pub fn push_integer(&mut self, value: i64) {
        self.push_signed(tag::universal::INTEGER, value);
    }

    /// Prepend a signed integer under an arbitrary tag.
    pub fn push_signed(&mut self, tag: u8, value: i64) {
        let be = value.to_be_bytes();
        let mut start = 0;
        while start < be.len() - 1 {
            let redundant = (be[start] == 0x00 && be[start + 1] & 0x80 == 0)
                || (be[start] == 0xFF && be[start + 1] & 0x80 != 0);
            if !redundant {
                break;
            }
            start += 1;
        }
        self.push_primitive(tag, &be[start..]);
    }

    /// Prepend an unsigned 32-bit value (Counter32, Gauge32, TimeTicks).
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        self.push_unsigned64(tag, u64::from(value));
    }

    /// Prepend an unsigned 64-bit value, adding a leading zero octet when
    /// the high bit would otherwise read as a sign.
    pub fn push_unsigned64(&mut self, tag: u8, value: u64) {
        let be = value.to_be_bytes();
        let skip = be.iter().take_while(|&&b| b == 0).count().min(7);
        let content = &be[skip..];
        let start = self.buf.len();
        self.push_bytes(content);
        if content[0] & 0x80 != 0 {
            self.buf.push(0x00);
        }
        let content_len = self.buf.len() - start;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Prepend an OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_primitive(tag::universal::OCTET_STRING, data);
    }

    /// Prepend a NULL.
    pub fn push_null(&mut self) {
        self.push_primitive(tag::universal::NULL, &[]);
    }

    /// Prepend an OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &Oid) {
        self.push_primitive(tag::universal::OBJECT_IDENTIFIER, &oid.to_ber());
    }

    /// Prepend an IpAddress.
    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_primitive(tag::application::IP_ADDRESS, &addr);
    }

    /// Consume the buffer, returning the encoded bytes in wire order.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}
