//! SNMP value types.
//!
//! The `Value` enum represents every SNMP v1/v2c data type that can appear
//! in a varbind or be nested inside a [`Sequence`].

use std::fmt;
use std::net::Ipv4Addr;

use bytes::Bytes;

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result, ValueErrorKind};
use crate::oid::Oid;
use crate::sequence::Sequence;

/// SNMP value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (ASN.1 primitive, signed).
    Integer(i64),

    /// OCTET STRING (arbitrary bytes).
    ///
    /// Rendered as text when printable, otherwise as hex. See
    /// [`is_printable`].
    OctetString(Bytes),

    /// NULL. Carries no value.
    Null,

    /// OBJECT IDENTIFIER.
    ObjectIdentifier(Oid),

    /// IpAddress (4 bytes, big-endian).
    IpAddress([u8; 4]),

    /// Counter32 (unsigned 32-bit, wrapping).
    Counter32(u32),

    /// Gauge32 / Unsigned32 (unsigned 32-bit, non-wrapping).
    Gauge32(u32),

    /// TimeTicks (hundredths of seconds).
    TimeTicks(u32),

    /// Opaque (legacy, arbitrary bytes).
    Opaque(Bytes),

    /// Counter64 (unsigned 64-bit, wrapping).
    Counter64(u64),

    /// SEQUENCE of nested values.
    Sequence(Sequence),

    /// noSuchObject exception.
    NoSuchObject,

    /// noSuchInstance exception.
    NoSuchInstance,

    /// endOfMibView exception.
    EndOfMibView,

    /// Unknown tag, preserved with its raw content.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// Build an IpAddress from dotted-quad text.
    ///
    /// ```
    /// use snmp_trap::Value;
    ///
    /// let v = Value::ip_address("10.0.0.254").unwrap();
    /// assert_eq!(v, Value::IpAddress([10, 0, 0, 254]));
    /// assert!(Value::ip_address("10.0.0").is_err());
    /// ```
    pub fn ip_address(text: &str) -> Result<Self> {
        text.parse::<Ipv4Addr>()
            .map(|addr| Value::IpAddress(addr.octets()))
            .map_err(|_| Error::bad_value(ValueErrorKind::InvalidIpAddress(text.into())))
    }

    /// Build an OctetString from hex pairs, with or without separators.
    ///
    /// ```
    /// use snmp_trap::Value;
    ///
    /// let v = Value::octet_string_from_hex("00 1A:2b").unwrap();
    /// assert_eq!(v.as_bytes(), Some(&[0x00, 0x1A, 0x2B][..]));
    /// ```
    pub fn octet_string_from_hex(text: &str) -> Result<Self> {
        let digits: Vec<u8> = text
            .bytes()
            .filter(|b| !matches!(b, b' ' | b':' | b'-'))
            .collect();
        let invalid = || Error::bad_value(ValueErrorKind::InvalidHex(text.into()));
        if digits.len() % 2 != 0 {
            return Err(invalid());
        }
        digits
            .chunks_exact(2)
            .map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
                    .ok_or_else(invalid)
            })
            .collect::<Result<Vec<u8>>>()
            .map(|bytes| Value::OctetString(Bytes::from(bytes)))
    }

    /// The BER tag this value encodes under.
    pub fn tag(&self) -> u8 {
        match self {
            Value::Integer(_) => tag::universal::INTEGER,
            Value::OctetString(_) => tag::universal::OCTET_STRING,
            Value::Null => tag::universal::NULL,
            Value::ObjectIdentifier(_) => tag::universal::OBJECT_IDENTIFIER,
            Value::IpAddress(_) => tag::application::IP_ADDRESS,
            Value::Counter32(_) => tag::application::COUNTER32,
            Value::Gauge32(_) => tag::application::GAUGE32,
            Value::TimeTicks(_) => tag::application::TIMETICKS,
            Value::Opaque(_) => tag::application::OPAQUE,
            Value::Counter64(_) => tag::application::COUNTER64,
            Value::Sequence(_) => tag::universal::SEQUENCE,
            Value::NoSuchObject => tag::context::NO_SUCH_OBJECT,
            Value::NoSuchInstance => tag::context::NO_SUCH_INSTANCE,
            Value::EndOfMibView => tag::context::END_OF_MIB_VIEW,
            Value::Unknown { tag, .. } => *tag,
        }
    }

    /// Variant name, used in type-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::OctetString(_) => "OctetString",
            Value::Null => "Null",
            Value::ObjectIdentifier(_) => "ObjectIdentifier",
            Value::IpAddress(_) => "IpAddress",
            Value::Counter32(_) => "Counter32",
            Value::Gauge32(_) => "Gauge32",
            Value::TimeTicks(_) => "TimeTicks",
            Value::Opaque(_) => "Opaque",
            Value::Counter64(_) => "Counter64",
            Value::Sequence(_) => "Sequence",
            Value::NoSuchObject => "NoSuchObject",
            Value::NoSuchInstance => "NoSuchInstance",
            Value::EndOfMibView => "EndOfMibView",
            Value::Unknown { .. } => "Unknown",
        }
    }

    /// Replace the held value with another of the same kind.
    ///
    /// Null holds nothing and rejects every assignment. Any other kind
    /// change is a type mismatch.
    ///
    /// ```
    /// use snmp_trap::Value;
    ///
    /// let mut v = Value::TimeTicks(0);
    /// v.set(Value::TimeTicks(4200)).unwrap();
    /// assert_eq!(v, Value::TimeTicks(4200));
    ///
    /// assert!(v.set(Value::Integer(1)).is_err());
    /// assert!(Value::Null.set(Value::Null).is_err());
    /// ```
    pub fn set(&mut self, value: Value) -> Result<()> {
        if matches!(self, Value::Null) {
            return Err(Error::bad_value(ValueErrorKind::NullHasNoValue));
        }
        if std::mem::discriminant(self) != std::mem::discriminant(&value) {
            return Err(Error::TypeMismatch {
                expected: self.kind_name(),
                actual: value.kind_name(),
            }
            .boxed());
        }
        *self = value;
        Ok(())
    }

    /// Get as i64 if this is an integer-like value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(i64::from(*v)),
            Value::Counter64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Get as u32 if this is a 32-bit unsigned value, or a non-negative
    /// Integer that fits.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v),
            Value::Integer(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(u64::from(*v)),
            Value::Integer(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Get the raw bytes of an OctetString or Opaque.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(data) | Value::Opaque(data) => Some(data),
            _ => None,
        }
    }

    /// Get an OctetString as UTF-8 text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::OctetString(data) => std::str::from_utf8(data).ok(),
            _ => None,
        }
    }

    /// Get as an OID reference.
    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Get as an IPv4 address.
    pub fn as_ip(&self) -> Option<Ipv4Addr> {
        match self {
            Value::IpAddress(octets) => Some(Ipv4Addr::from(*octets)),
            _ => None,
        }
    }

    /// Get as a nested sequence.
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// True for OctetStrings that render as text.
    pub fn is_printable(&self) -> bool {
        matches!(self, Value::OctetString(data) if is_printable(data))
    }

    /// True for the v2 exception values.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => buf.push_primitive(tag::application::OPAQUE, data),
            Value::Counter64(v) => buf.push_unsigned64(tag::application::COUNTER64, *v),
            Value::Sequence(seq) => seq.encode(buf),
            Value::NoSuchObject => buf.push_primitive(tag::context::NO_SUCH_OBJECT, &[]),
            Value::NoSuchInstance => buf.push_primitive(tag::context::NO_SUCH_INSTANCE, &[]),
            Value::EndOfMibView => buf.push_primitive(tag::context::END_OF_MIB_VIEW, &[]),
            Value::Unknown { tag, data } => buf.push_primitive(*tag, data),
        }
    }

    /// Encode to a standalone TLV.
    pub fn to_ber(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        self.encode(&mut buf);
        buf.finish()
    }

    /// Decode one TLV from the decoder.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let at = decoder.offset();
        let tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        match tag {
            tag::universal::INTEGER => Ok(Value::Integer(decoder.read_integer_value(len)?)),
            tag::universal::OCTET_STRING => Ok(Value::OctetString(decoder.read_bytes(len)?)),
            tag::universal::NULL => {
                decoder.check_null_length(len)?;
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                Ok(Value::ObjectIdentifier(decoder.read_oid_value(len)?))
            }
            tag::universal::SEQUENCE => {
                let mut content = decoder.sub_decoder(len)?;
                Ok(Value::Sequence(Sequence::decode_content(&mut content)?))
            }
            tag::application::IP_ADDRESS => {
                Ok(Value::IpAddress(decoder.read_ip_address_value(len)?))
            }
            tag::application::COUNTER32 => {
                Ok(Value::Counter32(decoder.read_unsigned32_value(len)?))
            }
            tag::application::GAUGE32 => Ok(Value::Gauge32(decoder.read_unsigned32_value(len)?)),
            tag::application::TIMETICKS => {
                Ok(Value::TimeTicks(decoder.read_unsigned32_value(len)?))
            }
            tag::application::OPAQUE => Ok(Value::Opaque(decoder.read_bytes(len)?)),
            tag::application::COUNTER64 => {
                Ok(Value::Counter64(decoder.read_unsigned64_value(len)?))
            }
            tag::context::NO_SUCH_OBJECT => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.read_bytes(len)?;
                Ok(Value::EndOfMibView)
            }
            tag::universal::OCTET_STRING_CONSTRUCTED => {
                Err(Error::decode(at, DecodeErrorKind::ConstructedOctetString))
            }
            _ => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::Unknown { tag, data })
            }
        }
    }

    /// Decode a buffer holding exactly one TLV.
    ///
    /// ```
    /// use snmp_trap::Value;
    ///
    /// assert_eq!(Value::from_ber(&[0x43, 0x01, 0x64]).unwrap(), Value::TimeTicks(100));
    /// assert!(Value::from_ber(&[0x05, 0x00, 0x05, 0x00]).is_err());
    /// ```
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::from_slice(data);
        let value = Self::decode(&mut decoder)?;
        decoder.expect_end()?;
        Ok(value)
    }
}

/// True when `data` should render as text.
///
/// Every byte must be printable ASCII or tab/CR/LF. A single trailing NUL
/// is allowed, as left behind by C strings.
pub fn is_printable(data: &[u8]) -> bool {
    let body = match data.split_last() {
        Some((0, init)) => init,
        _ => data,
    };
    body.iter()
        .all(|&b| matches!(b, 0x20..=0x7E | b'\t' | b'\r' | b'\n'))
}

/// Format TimeTicks as `days:hours:minutes:seconds.hundredths`.
///
/// ```
/// use snmp_trap::value::format_timeticks;
///
/// assert_eq!(format_timeticks(106444246), "12:7:40:42.46");
/// assert_eq!(format_timeticks(100), "0:0:0:1.0");
/// ```
pub fn format_timeticks(ticks: u32) -> String {
    let hundredths = ticks % 100;
    let total_secs = ticks / 100;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = (total_secs / 3600) % 24;
    let days = total_secs / 86400;
    format!("{}:{}:{}:{}.{}", days, hours, mins, secs, hundredths)
}

fn write_hex(f: &mut fmt::Formatter<'_>, data: &[u8]) -> fmt::Result {
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{:02X}", byte)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) if is_printable(data) => {
                let text = data.strip_suffix(&[0]).unwrap_or(data);
                // printable bytes are ASCII, so this cannot fail
                f.write_str(std::str::from_utf8(text).unwrap_or_default())
            }
            Value::OctetString(data) => write_hex(f, data),
            Value::Null => f.write_str("Null"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => write!(f, "{}", Ipv4Addr::from(*addr)),
            Value::Counter32(v) | Value::Gauge32(v) => write!(f, "{}", v),
            Value::TimeTicks(v) => f.write_str(&format_timeticks(*v)),
            Value::Opaque(data) => write_hex(f, data),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::Sequence(seq) => write!(f, "{}", seq),
            Value::NoSuchObject => f.write_str("noSuchObject"),
            Value::NoSuchInstance => f.write_str("noSuchInstance"),
            Value::EndOfMibView => f.write_str("endOfMibView"),
            Value::Unknown { tag, data } => {
                write!(f, "[0x{:02X}] ", tag)?;
                write_hex(f, data)
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::OctetString(Bytes::from(s))
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Value::OctetString(Bytes::copy_from_slice(data))
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::OctetString(data)
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<Ipv4Addr> for Value {
    fn from(addr: Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}

impl From<[u8; 4]> for Value {
    fn from(addr: [u8; 4]) -> Self {
        Value::IpAddress(addr)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Counter64(v)
    }
}

impl From<Sequence> for Value {
    fn from(seq: Sequence) -> Self {
        Value::Sequence(seq)
    }
}
