//! SNMP v1/v2c message envelope.
//!
//! ```text
//! Message ::= SEQUENCE {
//!     version    INTEGER,
//!     community  OCTET STRING,
//!     data       ANY   -- PDU
//! }
//! ```

use bytes::Bytes;

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::pdu::{BasicPdu, Pdu, TrapV1Pdu, TrapV2Pdu};
use crate::version::Version;

/// Community-based SNMP message.
///
/// ```
/// use snmp_trap::{Message, Pdu, TrapV2Pdu, oid};
///
/// let trap = TrapV2Pdu::notification(1, 500, oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1), vec![]);
/// let msg = Message::v2c("public", Pdu::TrapV2(trap));
///
/// let decoded = Message::decode(msg.encode()).unwrap();
/// assert_eq!(decoded, msg);
/// assert_eq!(decoded.trap_v2().unwrap().uptime(), Some(500));
/// assert!(decoded.trap_v1().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// SNMP version
    pub version: Version,
    /// Community string
    pub community: Bytes,
    /// Protocol data unit
    pub pdu: Pdu,
}

impl Message {
    /// Create a new message.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    /// Create a v1 message.
    pub fn v1(community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self::new(Version::V1, community, pdu)
    }

    /// Create a v2c message.
    pub fn v2c(community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self::new(Version::V2c, community, pdu)
    }

    /// Get a reference to the PDU.
    pub fn pdu(&self) -> &Pdu {
        &self.pdu
    }

    /// Consume and return the PDU.
    pub fn into_pdu(self) -> Pdu {
        self.pdu
    }

    /// The PDU as a request/response, or a type-mismatch error.
    pub fn basic_pdu(&self) -> Result<&BasicPdu> {
        self.pdu.as_basic()
    }

    /// The PDU as a v1 trap, or a type-mismatch error.
    pub fn trap_v1(&self) -> Result<&TrapV1Pdu> {
        self.pdu.as_trap_v1()
    }

    /// The PDU as a v2 trap, or a type-mismatch error.
    pub fn trap_v2(&self) -> Result<&TrapV2Pdu> {
        self.pdu.as_trap_v2()
    }

    /// The PDU as an inform request, or a type-mismatch error.
    pub fn inform_request(&self) -> Result<&TrapV2Pdu> {
        self.pdu.as_inform()
    }

    /// Encode to BER.
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::with_capacity(256);
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i64());
        });
        buf.finish()
    }

    /// Decode from BER.
    ///
    /// The buffer must hold exactly one SEQUENCE of exactly three elements.
    pub fn decode(data: Bytes) -> Result<Self> {
        let mut decoder = Decoder::new(data);
        let mut seq = decoder.read_sequence()?;

        let version_at = seq.offset();
        let version_num = seq.read_integer()?;
        let version = Version::from_i64(version_num).ok_or_else(|| {
            Error::decode(version_at, DecodeErrorKind::UnknownVersion(version_num))
        })?;

        let community = seq.read_octet_string()?;
        let pdu = Pdu::decode(&mut seq)?;

        seq.expect_end()?;
        decoder.expect_end()?;

        Ok(Message {
            version,
            community,
            pdu,
        })
    }

    /// Decode from a byte slice (copies the data).
    pub fn decode_slice(data: &[u8]) -> Result<Self> {
        Self::decode(Bytes::copy_from_slice(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::pdu::GenericTrap;
    use crate::value::Value;
    use crate::varbind::VarBind;

    #[test]
    fn test_v1_trap_roundtrip() {
        let trap = TrapV1Pdu::new(
            oid!(1, 3, 6, 1, 4, 1, 8072),
            [127, 0, 0, 1],
            GenericTrap::ColdStart,
            0,
            42,
            vec![],
        );
        let msg = Message::v1("public", Pdu::TrapV1(trap.clone()));
        let decoded = Message::decode(msg.encode()).unwrap();
        assert_eq!(decoded.version, Version::V1);
        assert_eq!(decoded.community.as_ref(), b"public");
        assert_eq!(decoded.trap_v1().unwrap(), &trap);
    }

    #[test]
    fn test_v2c_trap_wire_bytes() {
        let trap = TrapV2Pdu::notification(1, 0, oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1), vec![]);
        let msg = Message::v2c("public", Pdu::TrapV2(trap));
        let expected: &[u8] = &[
            0x30, 0x40, // Message
            0x02, 0x01, 0x01, // version v2c
            0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c', // community
            0xA7, 0x33, // SNMPv2-Trap-PDU
            0x02, 0x01, 0x01, // request-id
            0x02, 0x01, 0x00, // error-status
            0x02, 0x01, 0x00, // error-index
            0x30, 0x28, // varbinds
            0x30, 0x0D, 0x06, 0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x03, 0x00, // sysUpTime.0
            0x43, 0x01, 0x00, // TimeTicks 0
            0x30, 0x17, 0x06, 0x0A, 0x2B, 0x06, 0x01, 0x06, 0x03, 0x01, 0x01, 0x04, 0x01,
            0x00, // snmpTrapOID.0
            0x06, 0x09, 0x2B, 0x06, 0x01, 0x06, 0x03, 0x01, 0x01, 0x05, 0x01, // coldStart
        ];
        assert_eq!(msg.encode().as_ref(), expected);
        assert_eq!(Message::decode_slice(expected).unwrap(), msg);
    }

    #[test]
    fn test_inform_accessor() {
        let inform = TrapV2Pdu::new(5, vec![VarBind::new(oid!(1, 3, 6, 1), Value::Null)]);
        let msg = Message::v2c("private", Pdu::InformRequest(inform.clone()));
        assert_eq!(msg.inform_request().unwrap(), &inform);
        assert!(msg.trap_v2().is_err());
        assert!(msg.basic_pdu().is_err());
        assert_eq!(msg.into_pdu(), Pdu::InformRequest(inform));
    }

    #[test]
    fn test_unknown_version_rejected() {
        // version 3 is not a community message
        let data = [0x30, 0x08, 0x02, 0x01, 0x03, 0x04, 0x00, 0xA7, 0x00, 0x00];
        let err = Message::decode_slice(&data).unwrap_err();
        assert!(matches!(
            *err,
            Error::Decode {
                offset: 2,
                kind: DecodeErrorKind::UnknownVersion(3)
            }
        ));
    }

    #[test]
    fn test_fourth_element_rejected() {
        let msg = Message::v2c("c", Pdu::TrapV2(TrapV2Pdu::new(1, vec![])));
        let mut bytes = msg.encode().to_vec();
        // append a NULL inside the outer SEQUENCE
        bytes.extend_from_slice(&[0x05, 0x00]);
        bytes[1] += 2;
        let err = Message::decode_slice(&bytes).unwrap_err();
        assert!(matches!(
            *err,
            Error::Decode {
                kind: DecodeErrorKind::TrailingData { count: 2 },
                ..
            }
        ));
    }

    #[test]
    fn test_missing_pdu_rejected() {
        // SEQUENCE { INTEGER 1, OCTET STRING "c" }
        let data = [0x30, 0x06, 0x02, 0x01, 0x01, 0x04, 0x01, b'c'];
        assert!(Message::decode_slice(&data).is_err());
    }

    #[test]
    fn test_wrong_child_type_rejected() {
        // community encoded as INTEGER
        let data = [
            0x30, 0x0A, 0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0xA7, 0x02, 0x30, 0x00,
        ];
        let err = Message::decode_slice(&data).unwrap_err();
        assert!(matches!(
            *err,
            Error::Decode {
                offset: 5,
                kind: DecodeErrorKind::UnexpectedTag {
                    expected: 0x04,
                    actual: 0x02
                }
            }
        ));
    }

    #[test]
    fn test_bytes_after_message_rejected() {
        let msg = Message::v2c("c", Pdu::TrapV2(TrapV2Pdu::new(1, vec![])));
        let mut bytes = msg.encode().to_vec();
        bytes.push(0x00);
        assert!(Message::decode_slice(&bytes).is_err());
    }

    #[test]
    fn test_truncated_message() {
        let msg = Message::v2c("public", Pdu::TrapV2(TrapV2Pdu::new(1, vec![])));
        let bytes = msg.encode();
        for cut in 0..bytes.len() {
            assert!(Message::decode_slice(&bytes[..cut]).is_err(), "cut at {cut}");
        }
    }
}
