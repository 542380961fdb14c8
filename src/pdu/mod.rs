//! SNMP Protocol Data Units (PDUs).
//!
//! [`Pdu`] is a closed set of the shapes a v1/v2c message can carry:
//! the four request/response operations share [`BasicPdu`], while v1 traps
//! and v2 notifications have their own structs in [`trap`].

pub mod trap;

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

pub use trap::{GenericTrap, TrapV1Pdu, TrapV2Pdu};

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PduType {
    GetRequest = 0xA0,
    GetNextRequest = 0xA1,
    Response = 0xA2,
    SetRequest = 0xA3,
    TrapV1 = 0xA4,
    InformRequest = 0xA6,
    TrapV2 = 0xA7,
}

impl PduType {
    /// Create from tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            tag::pdu::GET_REQUEST => Some(Self::GetRequest),
            tag::pdu::GET_NEXT_REQUEST => Some(Self::GetNextRequest),
            tag::pdu::RESPONSE => Some(Self::Response),
            tag::pdu::SET_REQUEST => Some(Self::SetRequest),
            tag::pdu::TRAP_V1 => Some(Self::TrapV1),
            tag::pdu::INFORM_REQUEST => Some(Self::InformRequest),
            tag::pdu::TRAP_V2 => Some(Self::TrapV2),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// True for the four operations that share the [`BasicPdu`] layout.
    pub fn is_basic(self) -> bool {
        matches!(
            self,
            Self::GetRequest | Self::GetNextRequest | Self::Response | Self::SetRequest
        )
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
            Self::SetRequest => write!(f, "SetRequest"),
            Self::TrapV1 => write!(f, "TrapV1"),
            Self::InformRequest => write!(f, "InformRequest"),
            Self::TrapV2 => write!(f, "TrapV2"),
        }
    }
}

/// Get, GetNext, Set and Response PDUs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicPdu {
    /// PDU type; one of the [`PduType::is_basic`] kinds.
    pub pdu_type: PduType,
    /// Request ID for correlating requests and responses
    pub request_id: i32,
    /// Error status (0 for requests, error code for responses)
    pub error_status: i32,
    /// Error index (1-based index of problematic varbind)
    pub error_index: i32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl BasicPdu {
    fn request(pdu_type: PduType, request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Create a GET request PDU.
    pub fn get_request(request_id: i32, oids: &[Oid]) -> Self {
        let varbinds = oids.iter().cloned().map(VarBind::null).collect();
        Self::request(PduType::GetRequest, request_id, varbinds)
    }

    /// Create a GETNEXT request PDU.
    pub fn get_next_request(request_id: i32, oids: &[Oid]) -> Self {
        let varbinds = oids.iter().cloned().map(VarBind::null).collect();
        Self::request(PduType::GetNextRequest, request_id, varbinds)
    }

    /// Create a SET request PDU.
    pub fn set_request(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self::request(PduType::SetRequest, request_id, varbinds)
    }

    /// Create a successful Response PDU.
    pub fn response(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self::request(PduType::Response, request_id, varbinds)
    }

    /// Create a Response PDU reporting an error.
    pub fn error_response(
        request_id: i32,
        error_status: ErrorStatus,
        error_index: i32,
        varbinds: Vec<VarBind>,
    ) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id,
            error_status: error_status.as_i32(),
            error_index,
            varbinds,
        }
    }

    /// Check if this carries a non-zero error status.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Get the error status as an enum.
    ///
    /// Fails when the peer sent a code outside the defined range.
    pub fn error_status(&self) -> Result<ErrorStatus> {
        ErrorStatus::from_i32(self.error_status)
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(i64::from(self.error_index));
            buf.push_integer(i64::from(self.error_status));
            buf.push_integer(i64::from(self.request_id));
        });
    }

    fn decode_as(decoder: &mut Decoder, pdu_type: PduType) -> Result<Self> {
        let mut pdu = decoder.read_constructed(pdu_type.tag())?;
        let request_id = pdu.read_integer32()?;
        let error_status = pdu.read_integer32()?;
        let error_index = pdu.read_integer32()?;
        let varbinds = decode_varbind_list(&mut pdu)?;
        pdu.expect_end()?;

        Ok(BasicPdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }
}

/// Any PDU a v1/v2c message can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pdu {
    /// Get, GetNext, Set or Response.
    Basic(BasicPdu),
    /// SNMPv1 Trap.
    TrapV1(TrapV1Pdu),
    /// SNMPv2-Trap.
    TrapV2(TrapV2Pdu),
    /// InformRequest.
    InformRequest(TrapV2Pdu),
}

impl Pdu {
    /// The PDU type tag this variant encodes under.
    pub fn pdu_type(&self) -> PduType {
        match self {
            Pdu::Basic(pdu) => pdu.pdu_type,
            Pdu::TrapV1(_) => PduType::TrapV1,
            Pdu::TrapV2(_) => PduType::TrapV2,
            Pdu::InformRequest(_) => PduType::InformRequest,
        }
    }

    /// Variant name, used in type-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Pdu::Basic(_) => "BasicPdu",
            Pdu::TrapV1(_) => "TrapV1",
            Pdu::TrapV2(_) => "TrapV2",
            Pdu::InformRequest(_) => "InformRequest",
        }
    }

    /// Variable bindings of whichever variant this is.
    pub fn varbinds(&self) -> &[VarBind] {
        match self {
            Pdu::Basic(pdu) => &pdu.varbinds,
            Pdu::TrapV1(pdu) => &pdu.varbinds,
            Pdu::TrapV2(pdu) | Pdu::InformRequest(pdu) => &pdu.varbinds,
        }
    }

    fn mismatch(&self, expected: &'static str) -> Box<Error> {
        Error::TypeMismatch {
            expected,
            actual: self.kind_name(),
        }
        .boxed()
    }

    /// Borrow as a request/response PDU.
    pub fn as_basic(&self) -> Result<&BasicPdu> {
        match self {
            Pdu::Basic(pdu) => Ok(pdu),
            _ => Err(self.mismatch("BasicPdu")),
        }
    }

    /// Borrow as a v1 trap.
    pub fn as_trap_v1(&self) -> Result<&TrapV1Pdu> {
        match self {
            Pdu::TrapV1(pdu) => Ok(pdu),
            _ => Err(self.mismatch("TrapV1")),
        }
    }

    /// Borrow as a v2 trap.
    pub fn as_trap_v2(&self) -> Result<&TrapV2Pdu> {
        match self {
            Pdu::TrapV2(pdu) => Ok(pdu),
            _ => Err(self.mismatch("TrapV2")),
        }
    }

    /// Borrow as an inform request.
    pub fn as_inform(&self) -> Result<&TrapV2Pdu> {
        match self {
            Pdu::InformRequest(pdu) => Ok(pdu),
            _ => Err(self.mismatch("InformRequest")),
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Pdu::Basic(pdu) => pdu.encode(buf),
            Pdu::TrapV1(pdu) => pdu.encode(buf),
            Pdu::TrapV2(pdu) => pdu.encode_tagged(buf, tag::pdu::TRAP_V2),
            Pdu::InformRequest(pdu) => pdu.encode_tagged(buf, tag::pdu::INFORM_REQUEST),
        }
    }

    /// Decode, choosing the variant from the PDU's own tag.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let at = decoder.offset();
        let tag = decoder
            .peek_tag()
            .ok_or_else(|| Error::decode(at, DecodeErrorKind::TruncatedData))?;

        match PduType::from_tag(tag) {
            Some(PduType::TrapV1) => TrapV1Pdu::decode(decoder).map(Pdu::TrapV1),
            Some(PduType::TrapV2) => TrapV2Pdu::decode_tagged(decoder, tag).map(Pdu::TrapV2),
            Some(PduType::InformRequest) => {
                TrapV2Pdu::decode_tagged(decoder, tag).map(Pdu::InformRequest)
            }
            Some(pdu_type) => BasicPdu::decode_as(decoder, pdu_type).map(Pdu::Basic),
            None => Err(Error::decode(at, DecodeErrorKind::UnknownPduType(tag))),
        }
    }
}

impl From<BasicPdu> for Pdu {
    fn from(pdu: BasicPdu) -> Self {
        Pdu::Basic(pdu)
    }
}

impl From<TrapV1Pdu> for Pdu {
    fn from(pdu: TrapV1Pdu) -> Self {
        Pdu::TrapV1(pdu)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::oid;
    use crate::value::Value;

    fn roundtrip(pdu: &Pdu) -> Pdu {
        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf);
        let mut decoder = Decoder::new(buf.finish());
        let decoded = Pdu::decode(&mut decoder).unwrap();
        assert!(decoder.is_empty());
        decoded
    }

    #[test]
    fn test_get_request_roundtrip() {
        let pdu = Pdu::Basic(BasicPdu::get_request(
            12345,
            &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)],
        ));
        assert_eq!(roundtrip(&pdu), pdu);
        assert_eq!(pdu.pdu_type(), PduType::GetRequest);
    }

    #[test]
    fn test_basic_factories() {
        let oids = [oid!(1, 3, 6, 1)];
        assert_eq!(
            BasicPdu::get_next_request(1, &oids).pdu_type,
            PduType::GetNextRequest
        );
        let set = BasicPdu::set_request(2, vec![VarBind::new(oid!(1, 3), Value::Integer(5))]);
        assert_eq!(set.pdu_type, PduType::SetRequest);
        assert_eq!(roundtrip(&Pdu::Basic(set.clone())), Pdu::Basic(set));
    }

    #[test]
    fn test_error_status_lookup() {
        let pdu = BasicPdu::error_response(7, ErrorStatus::NotWritable, 1, vec![]);
        assert!(pdu.is_error());
        assert_eq!(pdu.error_status().unwrap(), ErrorStatus::NotWritable);

        let mut bogus = BasicPdu::response(7, vec![]);
        bogus.error_status = 42;
        assert!(bogus.error_status().is_err());
    }

    #[test]
    fn test_tags_on_wire() {
        let trap = TrapV2Pdu::new(1, vec![]);
        let mut buf = EncodeBuf::new();
        Pdu::TrapV2(trap.clone()).encode(&mut buf);
        assert_eq!(buf.finish()[0], 0xA7);

        let mut buf = EncodeBuf::new();
        Pdu::InformRequest(trap).encode(&mut buf);
        assert_eq!(buf.finish()[0], 0xA6);
    }

    #[test]
    fn test_decode_selects_variant_by_tag() {
        let trap = TrapV2Pdu::new(9, vec![VarBind::new(oid!(1, 3, 6), Value::Null)]);
        assert_eq!(
            roundtrip(&Pdu::InformRequest(trap.clone())),
            Pdu::InformRequest(trap.clone())
        );
        assert_eq!(roundtrip(&Pdu::TrapV2(trap.clone())), Pdu::TrapV2(trap));
    }

    #[test]
    fn test_unknown_pdu_tag() {
        // GetBulkRequest is not carried by this crate
        let data = Bytes::from_static(&[0xA5, 0x00]);
        let err = Pdu::decode(&mut Decoder::new(data)).unwrap_err();
        assert!(matches!(
            *err,
            Error::Decode {
                offset: 0,
                kind: DecodeErrorKind::UnknownPduType(0xA5)
            }
        ));
    }

    #[test]
    fn test_typed_accessors() {
        let pdu = Pdu::TrapV2(TrapV2Pdu::new(1, vec![]));
        assert!(pdu.as_trap_v2().is_ok());

        let err = pdu.as_trap_v1().unwrap_err();
        assert!(matches!(
            *err,
            Error::TypeMismatch {
                expected: "TrapV1",
                actual: "TrapV2"
            }
        ));
        assert!(pdu.as_inform().is_err());
        assert!(pdu.as_basic().is_err());
    }

    #[test]
    fn test_basic_pdu_trailing_element_rejected() {
        // GetRequest { 1, 0, 0, {}, NULL }
        let data = Bytes::from_static(&[
            0xA0, 0x0D, 0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x00, 0x05,
            0x00,
        ]);
        assert!(Pdu::decode(&mut Decoder::new(data)).is_err());
    }
}
