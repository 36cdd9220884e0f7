//! Descriptor-driven message decoding.

use schema::{FieldDescriptor, FieldType, MessageDescriptor, Registry};
use wire::{Reader, WireType};

use crate::error::{CodecError, CodecResult};
use crate::value::{MessageValue, Value};

/// Decodes an instance from `reader`.
///
/// With `len` given, a nested end boundary is established at `pos + len`;
/// otherwise the reader's full remaining range is consumed. Unknown field
/// numbers and wire-type mismatches on known fields are skipped for forward
/// compatibility; truncation and misaligned nested lengths fail the whole
/// decode with no partial result.
pub fn decode(
    desc: &MessageDescriptor,
    registry: &Registry,
    reader: &mut Reader<'_>,
    len: Option<usize>,
) -> CodecResult<MessageValue> {
    let prior = match len {
        Some(len) => Some(reader.limit(len)?),
        None => None,
    };

    let mut msg = MessageValue::new();
    while !reader.is_at_end() {
        let tag = reader.tag()?;
        match desc.field_by_number(tag.field) {
            Some(field) => decode_field(desc, registry, field, tag.wire_type, reader, &mut msg)?,
            None => reader.skip(tag.wire_type)?,
        }
    }

    if let Some(prior) = prior {
        reader.restore(prior)?;
    }
    Ok(msg)
}

/// Decodes an instance from a complete byte slice.
pub fn decode_from_slice(
    desc: &MessageDescriptor,
    registry: &Registry,
    bytes: &[u8],
) -> CodecResult<MessageValue> {
    let mut reader = Reader::new(bytes);
    decode(desc, registry, &mut reader, None)
}

fn decode_field(
    desc: &MessageDescriptor,
    registry: &Registry,
    field: &FieldDescriptor,
    wire_type: WireType,
    reader: &mut Reader<'_>,
    msg: &mut MessageValue,
) -> CodecResult<()> {
    let declared = field.ty.wire_type();

    // Packed block for a packable repeated field: one length-delimited run
    // of concatenated raw values. Accepted regardless of the declared
    // packing so decode interoperates with both encodings.
    if field.is_repeated()
        && field.ty.is_packable()
        && wire_type == WireType::LengthDelimited
        && declared != WireType::LengthDelimited
    {
        let len = reader.varint64()? as usize;
        let prior = reader.limit(len)?;
        while !reader.is_at_end() {
            let value = read_scalar(&field.ty, reader)?;
            msg.push(field.number, value);
        }
        reader.restore(prior)?;
        return Ok(());
    }

    if wire_type != declared {
        // Wire-type mismatch on a known field: skip it like an unknown field.
        return Ok(reader.skip(wire_type)?);
    }

    let value = match &field.ty {
        FieldType::String => Value::Str(reader.string()?.to_string()),
        FieldType::Bytes => Value::Bytes(reader.bytes()?.to_vec()),
        FieldType::Message(name) => {
            let nested_desc = registry
                .message(name)
                .ok_or_else(|| CodecError::UnknownType { name: name.clone() })?;
            let len = reader.varint64()? as usize;
            Value::Message(decode(nested_desc, registry, reader, Some(len))?)
        }
        FieldType::Map { key, value } => {
            let len = reader.varint64()? as usize;
            Value::Message(decode_map_entry(registry, key, value, reader, len)?)
        }
        _ => read_scalar(&field.ty, reader)?,
    };

    if field.is_repeated() {
        msg.push(field.number, value);
    } else {
        // Duplicate singular fields take last-value-wins; oneof assignment
        // clears sibling presence.
        msg.set(desc, field.number, value);
    }
    Ok(())
}

/// Decodes a map entry body: key = field 1, value = field 2; slots absent on
/// the wire take their zero value.
fn decode_map_entry(
    registry: &Registry,
    key_ty: &FieldType,
    val_ty: &FieldType,
    reader: &mut Reader<'_>,
    len: usize,
) -> CodecResult<MessageValue> {
    let prior = reader.limit(len)?;
    let mut entry = MessageValue::new();
    while !reader.is_at_end() {
        let tag = reader.tag()?;
        let ty = match tag.field {
            1 => key_ty,
            2 => val_ty,
            _ => {
                reader.skip(tag.wire_type)?;
                continue;
            }
        };
        if tag.wire_type != ty.wire_type() {
            reader.skip(tag.wire_type)?;
            continue;
        }
        let value = match ty {
            FieldType::String => Value::Str(reader.string()?.to_string()),
            FieldType::Bytes => Value::Bytes(reader.bytes()?.to_vec()),
            FieldType::Message(name) => {
                let nested_desc = registry
                    .message(name)
                    .ok_or_else(|| CodecError::UnknownType { name: name.clone() })?;
                let nested_len = reader.varint64()? as usize;
                Value::Message(decode(nested_desc, registry, reader, Some(nested_len))?)
            }
            FieldType::Map { .. } => {
                reader.skip(tag.wire_type)?;
                continue;
            }
            _ => read_scalar(ty, reader)?,
        };
        entry.set_raw(tag.field, value);
    }
    reader.restore(prior)?;

    for (number, ty) in [(1u32, key_ty), (2u32, val_ty)] {
        if !entry.is_present(number) {
            entry.set_raw(number, crate::value::default_value(ty));
        }
    }
    Ok(entry)
}

fn read_scalar(ty: &FieldType, reader: &mut Reader<'_>) -> CodecResult<Value> {
    Ok(match ty {
        FieldType::Bool => Value::Bool(reader.bool()?),
        FieldType::Int32 => Value::I32(reader.int32()?),
        FieldType::Int64 => Value::I64(reader.int64()?),
        FieldType::Uint32 => Value::U32(reader.varint32()?),
        FieldType::Uint64 => Value::U64(reader.varint64()?),
        FieldType::Sint32 => Value::I32(reader.sint32()?),
        FieldType::Sint64 => Value::I64(reader.sint64()?),
        FieldType::Fixed32 => Value::U32(reader.fixed32()?),
        FieldType::Fixed64 => Value::U64(reader.fixed64()?),
        FieldType::Sfixed32 => Value::I32(reader.sfixed32()?),
        FieldType::Sfixed64 => Value::I64(reader.sfixed64()?),
        FieldType::Float => Value::F32(reader.float()?),
        FieldType::Double => Value::F64(reader.double()?),
        FieldType::Enum(_) => Value::Enum(reader.int32()?),
        FieldType::String
        | FieldType::Bytes
        | FieldType::Message(_)
        | FieldType::Map { .. } => {
            unreachable!("read_scalar called for length-delimited type")
        }
    })
}
