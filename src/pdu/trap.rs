//! Notification PDUs: SNMPv1 Trap and the v2 Trap / InformRequest layout.

use std::fmt;

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::Result;
use crate::oid::{Oid, well_known};
use crate::pdu::BasicPdu;
use crate::value::Value;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// SNMPv1 generic trap types (RFC 1157 Section 4.1.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum GenericTrap {
    /// coldStart(0) - agent is reinitializing, config may change
    ColdStart = 0,
    /// warmStart(1) - agent is reinitializing, config unchanged
    WarmStart = 1,
    /// linkDown(2) - communication link failure
    LinkDown = 2,
    /// linkUp(3) - communication link came up
    LinkUp = 3,
    /// authenticationFailure(4) - improperly authenticated message received
    AuthenticationFailure = 4,
    /// egpNeighborLoss(5) - EGP peer marked down
    EgpNeighborLoss = 5,
    /// enterpriseSpecific(6) - vendor-specific trap, see specific_trap field
    EnterpriseSpecific = 6,
}

impl GenericTrap {
    /// Create from integer value.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::ColdStart),
            1 => Some(Self::WarmStart),
            2 => Some(Self::LinkDown),
            3 => Some(Self::LinkUp),
            4 => Some(Self::AuthenticationFailure),
            5 => Some(Self::EgpNeighborLoss),
            6 => Some(Self::EnterpriseSpecific),
            _ => None,
        }
    }

    /// Get the integer value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for GenericTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ColdStart => "coldStart",
            Self::WarmStart => "warmStart",
            Self::LinkDown => "linkDown",
            Self::LinkUp => "linkUp",
            Self::AuthenticationFailure => "authenticationFailure",
            Self::EgpNeighborLoss => "egpNeighborLoss",
            Self::EnterpriseSpecific => "enterpriseSpecific",
        };
        f.write_str(name)
    }
}

/// SNMPv1 Trap PDU (RFC 1157 Section 4.1.6).
///
/// This PDU type has a completely different structure from other PDUs.
/// It is only used in SNMPv1 and is replaced by SNMPv2-Trap in v2c.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapV1Pdu {
    /// Enterprise OID (sysObjectID of the entity generating the trap)
    pub enterprise: Oid,
    /// Agent address (IP address of the agent generating the trap)
    pub agent_addr: [u8; 4],
    /// Generic trap type
    pub generic_trap: i32,
    /// Specific trap code (meaningful when generic_trap is enterpriseSpecific)
    pub specific_trap: i32,
    /// Time since the network entity was last (re)initialized (in hundredths of seconds)
    pub time_stamp: u32,
    /// Variable bindings containing "interesting" information
    pub varbinds: Vec<VarBind>,
}

impl TrapV1Pdu {
    /// Create a new SNMPv1 Trap PDU.
    pub fn new(
        enterprise: Oid,
        agent_addr: [u8; 4],
        generic_trap: GenericTrap,
        specific_trap: i32,
        time_stamp: u32,
        varbinds: Vec<VarBind>,
    ) -> Self {
        Self {
            enterprise,
            agent_addr,
            generic_trap: generic_trap.as_i32(),
            specific_trap,
            time_stamp,
            varbinds,
        }
    }

    /// Get the generic trap type as an enum.
    pub fn generic_trap_enum(&self) -> Option<GenericTrap> {
        GenericTrap::from_i32(self.generic_trap)
    }

    /// Check if this is an enterprise-specific trap.
    pub fn is_enterprise_specific(&self) -> bool {
        self.generic_trap == GenericTrap::EnterpriseSpecific.as_i32()
    }

    /// Translate to the SNMPv2 trap OID (RFC 3584 Section 3.1).
    ///
    /// - Generic traps 0-5 become `snmpTraps.{generic_trap + 1}`.
    /// - Enterprise-specific traps become `enterprise.0.specific_trap`.
    ///
    /// Returns `None` when `generic_trap` is outside 0..=6.
    ///
    /// ```rust
    /// use snmp_trap::pdu::{GenericTrap, TrapV1Pdu};
    /// use snmp_trap::oid;
    ///
    /// let trap = TrapV1Pdu::new(
    ///     oid!(1, 3, 6, 1, 4, 1, 9999),
    ///     [192, 168, 1, 1],
    ///     GenericTrap::LinkDown,
    ///     0,
    ///     12345,
    ///     vec![],
    /// );
    /// assert_eq!(trap.v2_trap_oid(), Some(oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 3)));
    ///
    /// let trap = TrapV1Pdu::new(
    ///     oid!(1, 3, 6, 1, 4, 1, 9999),
    ///     [192, 168, 1, 1],
    ///     GenericTrap::EnterpriseSpecific,
    ///     42,
    ///     12345,
    ///     vec![],
    /// );
    /// assert_eq!(trap.v2_trap_oid(), Some(oid!(1, 3, 6, 1, 4, 1, 9999, 0, 42)));
    /// ```
    pub fn v2_trap_oid(&self) -> Option<Oid> {
        match self.generic_trap_enum()? {
            GenericTrap::EnterpriseSpecific => Some(
                self.enterprise
                    .child(0)
                    // specific-trap is INTEGER but used as an arc
                    .child(u64::from(self.specific_trap as u32)),
            ),
            generic => Some(well_known::snmp_traps().child(generic.as_i32() as u64 + 1)),
        }
    }

    /// Translate to a v2 notification (RFC 3584 Section 3.1).
    ///
    /// The result starts with sysUpTime.0 (from `time_stamp`) and
    /// snmpTrapOID.0, carries the original varbinds, and appends
    /// snmpTrapAddress.0 and snmpTrapEnterprise.0.
    pub fn to_v2(&self, request_id: i32) -> Option<TrapV2Pdu> {
        let trap_oid = self.v2_trap_oid()?;
        let mut varbinds = self.varbinds.clone();
        varbinds.push(VarBind::new(
            well_known::snmp_trap_address_0(),
            Value::IpAddress(self.agent_addr),
        ));
        varbinds.push(VarBind::new(
            well_known::snmp_trap_enterprise_0(),
            Value::ObjectIdentifier(self.enterprise.clone()),
        ));
        Some(TrapV2Pdu::notification(
            request_id,
            self.time_stamp,
            trap_oid,
            varbinds,
        ))
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(tag::pdu::TRAP_V1, |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_unsigned32(tag::application::TIMETICKS, self.time_stamp);
            buf.push_integer(i64::from(self.specific_trap));
            buf.push_integer(i64::from(self.generic_trap));
            // NetworkAddress is APPLICATION 0 IMPLICIT IpAddress
            buf.push_ip_address(self.agent_addr);
            buf.push_oid(&self.enterprise);
        });
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut pdu = decoder.read_constructed(tag::pdu::TRAP_V1)?;

        let enterprise = pdu.read_oid()?;
        let agent_addr = pdu.read_ip_address()?;
        let generic_trap = pdu.read_integer32()?;
        let specific_trap = pdu.read_integer32()?;
        let time_stamp = pdu.read_unsigned32(tag::application::TIMETICKS)?;
        let varbinds = decode_varbind_list(&mut pdu)?;
        pdu.expect_end()?;

        Ok(TrapV1Pdu {
            enterprise,
            agent_addr,
            generic_trap,
            specific_trap,
            time_stamp,
            varbinds,
        })
    }
}

/// SNMPv2-Trap and InformRequest PDU body (RFC 3416 Section 4.2.6, 4.2.7).
///
/// Both share the request/response layout; the enclosing [`Pdu`](crate::Pdu)
/// variant decides which tag goes on the wire. By convention the first two
/// varbinds are sysUpTime.0 and snmpTrapOID.0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapV2Pdu {
    /// Request ID
    pub request_id: i32,
    /// Error status, zero when sent
    pub error_status: i32,
    /// Error index, zero when sent
    pub error_index: i32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl TrapV2Pdu {
    /// Create a notification body from raw varbinds.
    pub fn new(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Create a notification, prepending sysUpTime.0 and snmpTrapOID.0.
    ///
    /// ```
    /// use snmp_trap::pdu::TrapV2Pdu;
    /// use snmp_trap::{VarBind, Value, oid};
    ///
    /// let link_up = oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 4);
    /// let trap = TrapV2Pdu::notification(
    ///     1,
    ///     4200,
    ///     link_up.clone(),
    ///     vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1, 3), Value::Integer(3))],
    /// );
    /// assert_eq!(trap.uptime(), Some(4200));
    /// assert_eq!(trap.trap_oid(), Some(&link_up));
    /// assert_eq!(trap.payload().len(), 1);
    /// ```
    pub fn notification(
        request_id: i32,
        uptime: u32,
        trap_oid: Oid,
        varbinds: impl IntoIterator<Item = VarBind>,
    ) -> Self {
        let mut all = vec![
            VarBind::new(well_known::sys_uptime_0(), Value::TimeTicks(uptime)),
            VarBind::new(well_known::snmp_trap_oid_0(), Value::ObjectIdentifier(trap_oid)),
        ];
        all.extend(varbinds);
        Self::new(request_id, all)
    }

    /// sysUpTime.0 when it is the first varbind.
    pub fn uptime(&self) -> Option<u32> {
        match self.varbinds.first()? {
            VarBind {
                oid,
                value: Value::TimeTicks(ticks),
            } if *oid == well_known::sys_uptime_0() => Some(*ticks),
            _ => None,
        }
    }

    /// snmpTrapOID.0 when it is the second varbind.
    pub fn trap_oid(&self) -> Option<&Oid> {
        match self.varbinds.get(1)? {
            VarBind {
                oid,
                value: Value::ObjectIdentifier(trap_oid),
            } if *oid == well_known::snmp_trap_oid_0() => Some(trap_oid),
            _ => None,
        }
    }

    /// Varbinds after the sysUpTime.0 / snmpTrapOID.0 header.
    ///
    /// Returns every varbind when the header is missing.
    pub fn payload(&self) -> &[VarBind] {
        if self.uptime().is_some() && self.trap_oid().is_some() {
            &self.varbinds[2..]
        } else {
            &self.varbinds
        }
    }

    /// Build the Response that acknowledges this PDU as an inform.
    ///
    /// The response echoes the request ID and varbinds with zero error
    /// fields (RFC 3416 Section 4.2.7).
    pub fn to_response(&self) -> BasicPdu {
        BasicPdu::response(self.request_id, self.varbinds.clone())
    }

    pub(crate) fn encode_tagged(&self, buf: &mut EncodeBuf, pdu_tag: u8) {
        buf.push_constructed(pdu_tag, |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(i64::from(self.error_index));
            buf.push_integer(i64::from(self.error_status));
            buf.push_integer(i64::from(self.request_id));
        });
    }

    pub(crate) fn decode_tagged(decoder: &mut Decoder, pdu_tag: u8) -> Result<Self> {
        let mut pdu = decoder.read_constructed(pdu_tag)?;
        let request_id = pdu.read_integer32()?;
        let error_status = pdu.read_integer32()?;
        let error_index = pdu.read_integer32()?;
        let varbinds = decode_varbind_list(&mut pdu)?;
        pdu.expect_end()?;

        Ok(TrapV2Pdu {
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::error::{DecodeErrorKind, Error};
    use crate::oid;
    use crate::pdu::PduType;

    fn roundtrip_v1(trap: &TrapV1Pdu) -> TrapV1Pdu {
        let mut buf = EncodeBuf::new();
        trap.encode(&mut buf);
        TrapV1Pdu::decode(&mut Decoder::new(buf.finish())).unwrap()
    }

    #[test]
    fn test_trap_v1_roundtrip() {
        let trap = TrapV1Pdu::new(
            oid!(1, 3, 6, 1, 4, 1, 9999),
            [192, 168, 1, 1],
            GenericTrap::LinkDown,
            0,
            12345,
            vec![VarBind::new(
                oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1, 1),
                Value::Integer(1),
            )],
        );
        let decoded = roundtrip_v1(&trap);
        assert_eq!(decoded, trap);
        assert_eq!(decoded.generic_trap_enum(), Some(GenericTrap::LinkDown));
        assert!(!decoded.is_enterprise_specific());
    }

    #[test]
    fn test_trap_v1_wire_layout() {
        let trap = TrapV1Pdu::new(
            oid!(1, 3, 6),
            [10, 0, 0, 1],
            GenericTrap::ColdStart,
            0,
            1,
            vec![],
        );
        let mut buf = EncodeBuf::new();
        trap.encode(&mut buf);
        assert_eq!(
            buf.finish().as_ref(),
            &[
                0xA4, 0x15, // Trap-PDU
                0x06, 0x02, 0x2B, 0x06, // enterprise 1.3.6
                0x40, 0x04, 10, 0, 0, 1, // agent-addr
                0x02, 0x01, 0x00, // generic-trap
                0x02, 0x01, 0x00, // specific-trap
                0x43, 0x01, 0x01, // time-stamp
                0x30, 0x00, // varbinds
            ]
        );
    }

    #[test]
    fn test_trap_v1_enterprise_specific_negative_code() {
        let trap = TrapV1Pdu::new(
            oid!(1, 3, 6, 1, 4, 1, 1),
            [0, 0, 0, 0],
            GenericTrap::EnterpriseSpecific,
            -1,
            0,
            vec![],
        );
        assert_eq!(roundtrip_v1(&trap).specific_trap, -1);
        assert_eq!(
            trap.v2_trap_oid(),
            Some(oid!(1, 3, 6, 1, 4, 1, 1, 0, 4294967295))
        );
    }

    #[test]
    fn test_v2_trap_oid_generic_traps() {
        let cases = [
            (GenericTrap::ColdStart, 1),
            (GenericTrap::WarmStart, 2),
            (GenericTrap::LinkDown, 3),
            (GenericTrap::LinkUp, 4),
            (GenericTrap::AuthenticationFailure, 5),
            (GenericTrap::EgpNeighborLoss, 6),
        ];
        for (generic, last) in cases {
            let trap = TrapV1Pdu::new(oid!(1, 3, 6, 1, 4, 1, 1), [0; 4], generic, 0, 0, vec![]);
            assert_eq!(
                trap.v2_trap_oid(),
                Some(oid!(1, 3, 6, 1, 6, 3, 1, 1, 5).child(last)),
                "{generic}"
            );
        }
    }

    #[test]
    fn test_v2_trap_oid_out_of_range() {
        let mut trap = TrapV1Pdu::new(oid!(1, 3), [0; 4], GenericTrap::ColdStart, 0, 0, vec![]);
        trap.generic_trap = 9;
        assert_eq!(trap.v2_trap_oid(), None);
        assert!(trap.to_v2(1).is_none());
    }

    #[test]
    fn test_to_v2_translation() {
        let trap = TrapV1Pdu::new(
            oid!(1, 3, 6, 1, 4, 1, 2021),
            [172, 16, 0, 9],
            GenericTrap::WarmStart,
            0,
            777,
            vec![VarBind::new(oid!(1, 3, 6, 1, 4, 1, 2021, 1), "x")],
        );
        let v2 = trap.to_v2(5).unwrap();
        assert_eq!(v2.request_id, 5);
        assert_eq!(v2.uptime(), Some(777));
        assert_eq!(v2.trap_oid(), Some(&oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 2)));
        let payload = v2.payload();
        assert_eq!(payload.len(), 3);
        assert_eq!(payload[1].value, Value::IpAddress([172, 16, 0, 9]));
        assert_eq!(payload[2].oid, well_known::snmp_trap_enterprise_0());
    }

    #[test]
    fn test_trap_v1_bad_agent_addr() {
        // agent-addr with 3 bytes
        let data = Bytes::from_static(&[
            0xA4, 0x14, 0x06, 0x02, 0x2B, 0x06, 0x40, 0x03, 10, 0, 0, 0x02, 0x01, 0x00, 0x02,
            0x01, 0x00, 0x43, 0x01, 0x01, 0x30, 0x00,
        ]);
        let err = TrapV1Pdu::decode(&mut Decoder::new(data)).unwrap_err();
        assert!(matches!(
            *err,
            Error::Decode {
                kind: DecodeErrorKind::InvalidIpAddressLength { length: 3 },
                ..
            }
        ));
    }

    #[test]
    fn test_notification_header() {
        let trap = TrapV2Pdu::notification(3, 100, oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1), vec![]);
        assert_eq!(trap.varbinds.len(), 2);
        assert_eq!(trap.varbinds[0].oid, well_known::sys_uptime_0());
        assert_eq!(trap.uptime(), Some(100));
        assert!(trap.payload().is_empty());
    }

    #[test]
    fn test_headerless_notification() {
        let vb = VarBind::new(oid!(1, 3, 6, 1, 4, 1, 1), Value::Integer(1));
        let trap = TrapV2Pdu::new(3, vec![vb.clone()]);
        assert_eq!(trap.uptime(), None);
        assert_eq!(trap.trap_oid(), None);
        assert_eq!(trap.payload(), &[vb]);
    }

    #[test]
    fn test_to_response() {
        let inform = TrapV2Pdu::notification(
            99,
            1,
            oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1),
            vec![VarBind::new(oid!(1, 3, 6, 1, 4, 1, 1), "hi")],
        );
        let response = inform.to_response();
        assert_eq!(response.pdu_type, PduType::Response);
        assert_eq!(response.request_id, 99);
        assert_eq!(response.error_status, 0);
        assert_eq!(response.error_index, 0);
        assert_eq!(response.varbinds, inform.varbinds);
    }

    #[test]
    fn test_v2_roundtrip_with_tag() {
        let trap = TrapV2Pdu::notification(
            -5,
            0,
            oid!(1, 3, 6, 1, 4, 1, 1, 0, 1),
            vec![VarBind::new(oid!(1, 3, 6, 1, 4, 1, 1, 1), Value::Counter32(5))],
        );
        let mut buf = EncodeBuf::new();
        trap.encode_tagged(&mut buf, tag::pdu::INFORM_REQUEST);
        let bytes = buf.finish();
        assert_eq!(bytes[0], 0xA6);
        let decoded = TrapV2Pdu::decode_tagged(&mut Decoder::new(bytes), 0xA6).unwrap();
        assert_eq!(decoded, trap);
    }
}
