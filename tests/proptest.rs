//! Property-based tests for the BER codec and message model.

use bytes::Bytes;
use proptest::prelude::*;
use snmp_trap::ber::{Decoder, EncodeBuf, MAX_DEPTH, decode_length, encode_length, tag};
use snmp_trap::oid::Oid;
use snmp_trap::pdu::{BasicPdu, Pdu, PduType, TrapV1Pdu, TrapV2Pdu};
use snmp_trap::value::Value;
use snmp_trap::varbind::VarBind;
use snmp_trap::{Message, Sequence, Version};

// =============================================================================
// Strategies
// =============================================================================

/// OIDs that survive a BER round trip.
///
/// The first two arcs share one subidentifier `40 * a0 + a1` that decodes as
/// `(v / 40, v % 40)`, so a1 stays below 40. Single-arc OIDs come back with an
/// extra arc and are excluded.
fn arb_oid() -> impl Strategy<Value = Oid> {
    prop_oneof![
        Just(Oid::empty()),
        (0u64..=2, 0u64..40, prop::collection::vec(any::<u64>(), 0..=16)).prop_map(
            |(a0, a1, rest)| Oid::new([a0, a1].into_iter().chain(rest))
        ),
    ]
}

fn arb_bytes() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..=200).prop_map(Bytes::from)
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        arb_bytes().prop_map(Value::OctetString),
        Just(Value::Null),
        arb_oid().prop_map(Value::ObjectIdentifier),
        any::<[u8; 4]>().prop_map(Value::IpAddress),
        any::<u32>().prop_map(Value::Counter32),
        any::<u32>().prop_map(Value::Gauge32),
        any::<u32>().prop_map(Value::TimeTicks),
        arb_bytes().prop_map(Value::Opaque),
        any::<u64>().prop_map(Value::Counter64),
        Just(Value::NoSuchObject),
        Just(Value::NoSuchInstance),
        Just(Value::EndOfMibView),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 32, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(|items| Value::Sequence(Sequence::from(items)))
    })
}

fn arb_varbind() -> impl Strategy<Value = VarBind> {
    (arb_oid(), arb_scalar()).prop_map(|(oid, value)| VarBind::new(oid, value))
}

fn arb_varbinds() -> impl Strategy<Value = Vec<VarBind>> {
    prop::collection::vec(arb_varbind(), 0..8)
}

fn arb_pdu() -> impl Strategy<Value = Pdu> {
    prop_oneof![
        (any::<i32>(), 0i32..=18, any::<i32>(), arb_varbinds()).prop_map(
            |(request_id, error_status, error_index, varbinds)| {
                Pdu::Basic(BasicPdu {
                    pdu_type: PduType::Response,
                    request_id,
                    error_status,
                    error_index,
                    varbinds,
                })
            }
        ),
        (
            arb_oid(),
            any::<[u8; 4]>(),
            0i32..=6,
            any::<i32>(),
            any::<u32>(),
            arb_varbinds(),
        )
            .prop_map(
                |(enterprise, agent_addr, generic_trap, specific_trap, time_stamp, varbinds)| {
                    Pdu::TrapV1(TrapV1Pdu {
                        enterprise,
                        agent_addr,
                        generic_trap,
                        specific_trap,
                        time_stamp,
                        varbinds,
                    })
                },
            ),
        (any::<i32>(), arb_varbinds())
            .prop_map(|(id, varbinds)| Pdu::TrapV2(TrapV2Pdu::new(id, varbinds))),
        (any::<i32>(), arb_varbinds())
            .prop_map(|(id, varbinds)| Pdu::InformRequest(TrapV2Pdu::new(id, varbinds))),
    ]
}

fn arb_message() -> impl Strategy<Value = Message> {
    (
        prop_oneof![Just(Version::V1), Just(Version::V2c)],
        prop::collection::vec(any::<u8>(), 0..32),
        arb_pdu(),
    )
        .prop_map(|(version, community, pdu)| Message::new(version, community, pdu))
}

/// `depth` SEQUENCEs around a NULL, built without recursion.
fn nested_sequences(depth: usize) -> Bytes {
    let mut buf = EncodeBuf::new();
    buf.push_null();
    for _ in 0..depth {
        let content = buf.len();
        buf.push_length(content);
        buf.push_tag(tag::universal::SEQUENCE);
    }
    buf.finish()
}

// =============================================================================
// Codec properties
// =============================================================================

proptest! {
    #[test]
    fn oid_roundtrip(oid in arb_oid()) {
        let ber = oid.to_ber();
        prop_assert_eq!(Oid::from_ber(&ber).unwrap(), oid);
    }

    #[test]
    fn oid_text_roundtrip(oid in arb_oid()) {
        prop_assert_eq!(Oid::parse(&oid.to_string()).unwrap(), oid);
    }

    #[test]
    fn value_roundtrip(value in arb_value()) {
        let encoded = value.to_ber();
        prop_assert_eq!(Value::from_ber(&encoded).unwrap(), value);
    }

    #[test]
    fn integer_encoding_is_minimal(v in any::<i64>()) {
        let encoded = Value::Integer(v).to_ber();
        let content = &encoded[2..];
        prop_assert_eq!(encoded[1] as usize, content.len());
        if content.len() > 1 {
            // a redundant leading octet would repeat the sign of the next one
            let redundant = (content[0] == 0x00 && content[1] & 0x80 == 0)
                || (content[0] == 0xFF && content[1] & 0x80 != 0);
            prop_assert!(!redundant, "{:02X?}", content);
        }
    }

    #[test]
    fn length_roundtrip(len in 0usize..=0x20_0000) {
        let encoded = encode_length(len);
        let (decoded, consumed) = decode_length(&encoded, 0).unwrap();
        prop_assert_eq!(decoded, len);
        prop_assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn varbind_list_roundtrip(varbinds in arb_varbinds()) {
        let mut buf = EncodeBuf::new();
        snmp_trap::varbind::encode_varbind_list(&mut buf, &varbinds);
        let mut decoder = Decoder::new(buf.finish());
        prop_assert_eq!(snmp_trap::varbind::decode_varbind_list(&mut decoder).unwrap(), varbinds);
        prop_assert!(decoder.is_empty());
    }

    #[test]
    fn message_roundtrip(msg in arb_message()) {
        prop_assert_eq!(Message::decode(msg.encode()).unwrap(), msg);
    }

    #[test]
    fn truncated_message_never_decodes(msg in arb_message(), cut in any::<prop::sample::Index>()) {
        let bytes = msg.encode();
        let cut = cut.index(bytes.len());
        prop_assert!(Message::decode_slice(&bytes[..cut]).is_err());
    }

    #[test]
    fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = Message::decode_slice(&data);
        let _ = Value::from_ber(&data);
    }

    #[test]
    fn nesting_depth_is_bounded(depth in prop_oneof![0usize..=40, 41usize..16_000]) {
        let decoded = Value::from_ber(&nested_sequences(depth));
        prop_assert_eq!(decoded.is_ok(), depth <= MAX_DEPTH);
    }

    #[test]
    fn large_arbitrary_bytes_never_panic(
        data in prop::collection::vec(any::<u8>(), 60_000..=65_535),
    ) {
        let _ = Message::decode_slice(&data);
    }

    #[test]
    fn mutated_message_never_panics(
        msg in arb_message(),
        at in any::<prop::sample::Index>(),
        byte in any::<u8>(),
    ) {
        let mut bytes = msg.encode().to_vec();
        let at = at.index(bytes.len());
        bytes[at] = byte;
        let _ = Message::decode_slice(&bytes);
    }
}
