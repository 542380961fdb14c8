//! Standard notification fixtures.

use bytes::Bytes;
use snmp_trap::ber::{EncodeBuf, tag};
use snmp_trap::{GenericTrap, Oid, TrapV1Pdu, TrapV2Pdu, Value, VarBind, oid};

/// Enterprise OID used by the fixtures (net-snmp).
pub fn enterprise() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10)
}

/// linkDown notification OID (1.3.6.1.6.3.1.1.5.3).
pub fn link_down() -> Oid {
    oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 3)
}

/// ifIndex, ifAdminStatus and ifOperStatus for interface `index`.
pub fn interface_varbinds(index: u32) -> Vec<VarBind> {
    let index = u64::from(index);
    vec![
        VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1).child(index), Value::Integer(index as i64)),
        VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7).child(index), Value::Integer(1)),
        VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 8).child(index), Value::Integer(2)),
    ]
}

/// A v1 linkDown trap from 192.0.2.7.
pub fn link_down_v1(index: u32) -> TrapV1Pdu {
    TrapV1Pdu::new(
        enterprise(),
        [192, 0, 2, 7],
        GenericTrap::LinkDown,
        0,
        360_000,
        interface_varbinds(index),
    )
}

/// A v2 linkDown notification body.
pub fn link_down_v2(request_id: i32, index: u32) -> TrapV2Pdu {
    TrapV2Pdu::notification(request_id, 360_000, link_down(), interface_varbinds(index))
}

/// A notification whose encoding exceeds `len` bytes.
pub fn oversized_v2(request_id: i32, len: usize) -> TrapV2Pdu {
    TrapV2Pdu::notification(
        request_id,
        1,
        link_down(),
        [VarBind::new(
            oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
            Value::OctetString(Bytes::from(vec![b'x'; len])),
        )],
    )
}

/// An encoded v2c trap whose only varbind value is `depth` SEQUENCEs
/// wrapped around a NULL.
pub fn deeply_nested_v2(request_id: i32, depth: usize) -> Bytes {
    let mut buf = EncodeBuf::new();
    buf.push_sequence(|buf| {
        buf.push_constructed(tag::pdu::TRAP_V2, |buf| {
            buf.push_sequence(|buf| {
                buf.push_sequence(|buf| {
                    let start = buf.len();
                    buf.push_null();
                    for _ in 0..depth {
                        let content = buf.len() - start;
                        buf.push_length(content);
                        buf.push_tag(tag::universal::SEQUENCE);
                    }
                    buf.push_oid(&enterprise().child(99));
                });
            });
            buf.push_integer(0);
            buf.push_integer(0);
            buf.push_integer(i64::from(request_id));
        });
        buf.push_octet_string(b"public");
        buf.push_integer(1);
    });
    buf.finish()
}
