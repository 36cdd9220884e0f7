use proptest::prelude::*;
use wire::{decode_varint, encode_varint, varint_len, Reader, WireType, Writer};

#[derive(Clone, Debug)]
enum Op {
    Varint32(u32),
    Varint64(u64),
    Int32(i32),
    Sint32(i32),
    Sint64(i64),
    Bool(bool),
    Fixed32(u32),
    Fixed64(u64),
    Double(f64),
    Bytes(Vec<u8>),
    Str(String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::Varint32),
        any::<u64>().prop_map(Op::Varint64),
        any::<i32>().prop_map(Op::Int32),
        any::<i32>().prop_map(Op::Sint32),
        any::<i64>().prop_map(Op::Sint64),
        any::<bool>().prop_map(Op::Bool),
        any::<u32>().prop_map(Op::Fixed32),
        any::<u64>().prop_map(Op::Fixed64),
        prop::num::f64::NORMAL.prop_map(Op::Double),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Op::Bytes),
        ".{0,32}".prop_map(Op::Str),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..48)) {
        let mut writer = Writer::new();
        for op in &ops {
            match op {
                Op::Varint32(v) => writer.varint32(*v),
                Op::Varint64(v) => writer.varint64(*v),
                Op::Int32(v) => writer.int32(*v),
                Op::Sint32(v) => writer.sint32(*v),
                Op::Sint64(v) => writer.sint64(*v),
                Op::Bool(v) => writer.bool(*v),
                Op::Fixed32(v) => writer.fixed32(*v),
                Op::Fixed64(v) => writer.fixed64(*v),
                Op::Double(v) => writer.double(*v),
                Op::Bytes(v) => writer.bytes(v),
                Op::Str(v) => writer.string(v),
            }
        }
        let buf = writer.finish().unwrap();

        let mut reader = Reader::new(&buf);
        for op in &ops {
            match op {
                Op::Varint32(v) => prop_assert_eq!(reader.varint32().unwrap(), *v),
                Op::Varint64(v) => prop_assert_eq!(reader.varint64().unwrap(), *v),
                Op::Int32(v) => prop_assert_eq!(reader.int32().unwrap(), *v),
                Op::Sint32(v) => prop_assert_eq!(reader.sint32().unwrap(), *v),
                Op::Sint64(v) => prop_assert_eq!(reader.sint64().unwrap(), *v),
                Op::Bool(v) => prop_assert_eq!(reader.bool().unwrap(), *v),
                Op::Fixed32(v) => prop_assert_eq!(reader.fixed32().unwrap(), *v),
                Op::Fixed64(v) => prop_assert_eq!(reader.fixed64().unwrap(), *v),
                Op::Double(v) => prop_assert_eq!(reader.double().unwrap(), *v),
                Op::Bytes(v) => prop_assert_eq!(reader.bytes().unwrap(), v.as_slice()),
                Op::Str(v) => prop_assert_eq!(reader.string().unwrap(), v.as_str()),
            }
        }
        prop_assert!(reader.is_at_end());
    }

    #[test]
    fn prop_varint_minimal_length(value in any::<u64>()) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        prop_assert_eq!(buf.len(), varint_len(value));
        // Minimal form: the last byte never encodes trailing zero groups.
        if buf.len() > 1 {
            prop_assert_ne!(buf[buf.len() - 1], 0);
        }
        let (decoded, used) = decode_varint(&buf).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(used, buf.len());
    }

    #[test]
    fn prop_non_minimal_varint_decodes(value in 0u64..0x8_0000_0000) {
        // Pad the minimal form with redundant zero continuation groups.
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        let minimal_len = buf.len();
        let last = buf.len() - 1;
        buf[last] |= 0x80;
        buf.push(0x00);
        let (decoded, used) = decode_varint(&buf).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(used, minimal_len + 1);
    }

    #[test]
    fn prop_tag_roundtrip(field in 1u32..=wire::MAX_FIELD_NUMBER) {
        for wt in [WireType::Varint, WireType::Fixed64, WireType::LengthDelimited, WireType::Fixed32] {
            let mut writer = Writer::new();
            writer.tag(field, wt);
            let buf = writer.finish().unwrap();
            let mut reader = Reader::new(&buf);
            let tag = reader.tag().unwrap();
            prop_assert_eq!(tag.field, field);
            prop_assert_eq!(tag.wire_type, wt);
        }
    }

    #[test]
    fn prop_truncation_never_panics(data in prop::collection::vec(any::<u8>(), 0..128)) {
        // Feed arbitrary bytes through a decode loop; errors are fine,
        // panics are not.
        let mut reader = Reader::new(&data);
        while !reader.is_at_end() {
            let Ok(tag) = reader.tag() else { break };
            if reader.skip(tag.wire_type).is_err() {
                break;
            }
        }
    }
}
