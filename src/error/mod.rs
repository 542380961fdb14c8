//! Error types for snmp-trap.
//!
//! This module provides:
//!
//! - [`Error`] - The main error type for codec, model and transport failures
//! - [`DecodeErrorKind`] / [`ValueErrorKind`] - Detail carried by decode and value errors
//! - [`ErrorStatus`] - SNMP protocol error codes, with the v2c to v1 mapping
//!
//! # Error Handling
//!
//! Errors are boxed for efficiency: `Result<T> = Result<T, Box<Error>>`.
//!
//! ```rust
//! use snmp_trap::{Error, Message, Result};
//!
//! fn describe(result: Result<Message>) -> String {
//!     match result {
//!         Ok(msg) => format!("{} message", msg.version),
//!         Err(e) => match &*e {
//!             Error::Decode { offset, kind } => format!("bad bytes at {}: {}", offset, kind),
//!             Error::TypeMismatch { expected, actual } => {
//!                 format!("wanted {}, found {}", expected, actual)
//!             }
//!             other => other.to_string(),
//!         },
//!     }
//! }
//!
//! assert!(describe(Message::decode_slice(&[0x30, 0x05])).starts_with("bad bytes"));
//! ```

mod status;

use std::net::SocketAddr;

use crate::pdu::PduType;

pub use status::ErrorStatus;

/// Result type alias using the library's boxed Error type.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Data truncated unexpectedly.
    TruncatedData,
    /// Declared length runs past the end of the buffer.
    InsufficientData { needed: usize, available: usize },
    /// Invalid BER length encoding.
    InvalidLength,
    /// Indefinite length not supported.
    IndefiniteLength,
    /// Length field too long.
    LengthTooLong { octets: usize },
    /// Length exceeds maximum.
    LengthExceedsMax { length: usize, max: usize },
    /// Zero-length integer.
    ZeroLengthInteger,
    /// Integer content does not fit the target type.
    IntegerOverflow { length: usize },
    /// NULL with non-zero length.
    InvalidNull,
    /// Invalid IP address length.
    InvalidIpAddressLength { length: usize },
    /// Last OID subidentifier has its continuation bit set.
    InvalidOidEncoding,
    /// OID subidentifier does not fit in 64 bits.
    SubidentifierOverflow,
    /// Constructed OCTET STRING not supported.
    ConstructedOctetString,
    /// Unknown SNMP version.
    UnknownVersion(i64),
    /// Unknown PDU type.
    UnknownPduType(u8),
    /// Bytes left over after a complete element.
    TrailingData { count: usize },
    /// Constructed encodings nested deeper than the decoder allows.
    NestingTooDeep { max: usize },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::InsufficientData { needed, available } => {
                write!(f, "need {} bytes but only {} remaining", needed, available)
            }
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::IntegerOverflow { length } => {
                write!(f, "integer of {} bytes overflows", length)
            }
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
            Self::InvalidOidEncoding => write!(f, "invalid OID encoding"),
            Self::SubidentifierOverflow => write!(f, "OID subidentifier overflows 64 bits"),
            Self::ConstructedOctetString => {
                write!(f, "constructed OCTET STRING (0x24) not supported")
            }
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::TrailingData { count } => {
                write!(f, "{} unexpected trailing bytes", count)
            }
            Self::NestingTooDeep { max } => {
                write!(f, "constructed nesting deeper than {} levels", max)
            }
        }
    }
}

/// Value construction error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueErrorKind {
    /// OID component is negative.
    NegativeArc { index: usize, value: i64 },
    /// OID component is not a number.
    InvalidArc(Box<str>),
    /// Text is not a dotted-quad IPv4 address.
    InvalidIpAddress(Box<str>),
    /// Text is not a sequence of hex pairs.
    InvalidHex(Box<str>),
    /// Null carries no value and cannot be assigned one.
    NullHasNoValue,
    /// Error status code outside 0..=18.
    ErrorStatusOutOfRange(i64),
}

impl std::fmt::Display for ValueErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeArc { index, value } => {
                write!(f, "OID arc {} is negative ({})", index, value)
            }
            Self::InvalidArc(input) => write!(f, "invalid OID arc in {:?}", input),
            Self::InvalidIpAddress(input) => write!(f, "invalid IP address {:?}", input),
            Self::InvalidHex(input) => write!(f, "invalid hex string {:?}", input),
            Self::NullHasNoValue => write!(f, "Null cannot hold a value"),
            Self::ErrorStatusOutOfRange(v) => write!(f, "error status {} out of range", v),
        }
    }
}

/// The main error type for all snmp-trap operations.
///
/// Errors are boxed (via [`Result`]) to keep the size small on the stack.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed BER or SNMP structure.
    #[error("decode error at offset {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// Value rejected at construction time.
    #[error("bad value: {kind}")]
    BadValue { kind: ValueErrorKind },

    /// A typed accessor was used on the wrong variant.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A PDU arrived that the receiver has no registry for.
    #[error("unexpected {pdu_type} PDU")]
    UnexpectedPdu { pdu_type: PduType },

    /// Socket bind/send/receive failure.
    #[error("I/O error: {source}")]
    Io {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),

    /// A listener panicked while handling a notification.
    #[error("{registry} listener panicked")]
    ListenerPanicked { registry: &'static str },
}

impl Error {
    /// Box this error (convenience for constructing boxed errors).
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Build a boxed decode error, logging the detail at debug level.
    pub(crate) fn decode(offset: usize, kind: DecodeErrorKind) -> Box<Self> {
        tracing::debug!(target: "snmp_trap::ber", { snmp.offset = offset, %kind }, "decode error");
        Error::Decode { offset, kind }.boxed()
    }

    /// Build a boxed bad-value error.
    pub(crate) fn bad_value(kind: ValueErrorKind) -> Box<Self> {
        Error::BadValue { kind }.boxed()
    }

    /// Build a boxed I/O error.
    pub(crate) fn io(target: Option<SocketAddr>, source: std::io::Error) -> Box<Self> {
        Error::Io { target, source }.boxed()
    }

    /// True for malformed-input errors (as opposed to local or transport failures).
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }
}
