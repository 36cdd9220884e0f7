//! Descriptor-driven message encoding.

use schema::{FieldDescriptor, FieldType, MessageDescriptor, Registry};
use wire::{WireType, Writer};

use crate::error::{CodecError, CodecResult};
use crate::value::{is_default, MessageValue, Value};

/// Encodes an instance into `writer`, walking fields in declaration order.
///
/// Singular scalar fields equal to their proto3 default are omitted, empty
/// repeated fields are omitted, and oneof members emit only the active case.
/// Encode checks value/descriptor type shape but performs no semantic
/// validation; callers wanting validation use `verify` first.
pub fn encode(
    desc: &MessageDescriptor,
    registry: &Registry,
    msg: &MessageValue,
    writer: &mut Writer,
) -> CodecResult<()> {
    for field in &desc.fields {
        if field.is_repeated() {
            encode_repeated(desc, registry, field, msg, writer)?;
        } else if let Some(value) = msg.get(field.number) {
            // Oneof members have explicit presence; plain singular fields
            // at their zero value stay off the wire.
            if field.oneof.is_none() && is_default(&field.ty, value) {
                continue;
            }
            encode_field(desc, registry, field, value, writer)?;
        }
    }
    Ok(())
}

/// Encodes an instance into a fresh buffer.
pub fn encode_to_vec(
    desc: &MessageDescriptor,
    registry: &Registry,
    msg: &MessageValue,
) -> CodecResult<Vec<u8>> {
    let mut writer = Writer::new();
    encode(desc, registry, msg, &mut writer)?;
    Ok(writer.finish()?)
}

fn encode_repeated(
    desc: &MessageDescriptor,
    registry: &Registry,
    field: &FieldDescriptor,
    msg: &MessageValue,
    writer: &mut Writer,
) -> CodecResult<()> {
    let values = msg.get_repeated(field.number);
    if values.is_empty() {
        return Ok(());
    }
    if field.is_packed() {
        // One tag, one length-delimited block of concatenated raw values.
        writer.tag(field.number, WireType::LengthDelimited);
        writer.fork();
        for value in values {
            encode_scalar(desc, field, value, writer)?;
        }
        writer.ldelim()?;
        return Ok(());
    }
    for value in values {
        encode_field(desc, registry, field, value, writer)?;
    }
    Ok(())
}

fn encode_field(
    desc: &MessageDescriptor,
    registry: &Registry,
    field: &FieldDescriptor,
    value: &Value,
    writer: &mut Writer,
) -> CodecResult<()> {
    writer.tag(field.number, field.ty.wire_type());
    match &field.ty {
        FieldType::String => match value {
            Value::Str(v) => writer.string(v),
            other => return Err(mismatch(desc, field, "string", other)),
        },
        FieldType::Bytes => match value {
            Value::Bytes(v) => writer.bytes(v),
            other => return Err(mismatch(desc, field, "bytes", other)),
        },
        FieldType::Message(name) => match value {
            Value::Message(nested) => {
                let nested_desc =
                    registry
                        .message(name)
                        .ok_or_else(|| CodecError::UnknownType {
                            name: name.clone(),
                        })?;
                writer.fork();
                encode(nested_desc, registry, nested, writer)?;
                writer.ldelim()?;
            }
            other => return Err(mismatch(desc, field, "message", other)),
        },
        FieldType::Map { key, value: val_ty } => match value {
            Value::Message(entry) => {
                writer.fork();
                encode_map_entry(desc, registry, field, key, val_ty, entry, writer)?;
                writer.ldelim()?;
            }
            other => return Err(mismatch(desc, field, "map entry", other)),
        },
        _ => encode_scalar(desc, field, value, writer)?,
    }
    Ok(())
}

/// Writes a map entry body: key = field 1, value = field 2, defaults omitted.
fn encode_map_entry(
    desc: &MessageDescriptor,
    registry: &Registry,
    field: &FieldDescriptor,
    key_ty: &FieldType,
    val_ty: &FieldType,
    entry: &MessageValue,
    writer: &mut Writer,
) -> CodecResult<()> {
    for (number, ty) in [(1u32, key_ty), (2u32, val_ty)] {
        let Some(value) = entry.get(number) else {
            continue;
        };
        if is_default(ty, value) {
            continue;
        }
        writer.tag(number, ty.wire_type());
        match ty {
            FieldType::String => match value {
                Value::Str(v) => writer.string(v),
                other => return Err(mismatch(desc, field, "string", other)),
            },
            FieldType::Bytes => match value {
                Value::Bytes(v) => writer.bytes(v),
                other => return Err(mismatch(desc, field, "bytes", other)),
            },
            FieldType::Message(name) => match value {
                Value::Message(nested) => {
                    let nested_desc =
                        registry
                            .message(name)
                            .ok_or_else(|| CodecError::UnknownType {
                                name: name.clone(),
                            })?;
                    writer.fork();
                    encode(nested_desc, registry, nested, writer)?;
                    writer.ldelim()?;
                }
                other => return Err(mismatch(desc, field, "message", other)),
            },
            FieldType::Map { .. } => {
                return Err(mismatch(desc, field, "scalar map slot", value));
            }
            _ => encode_scalar_raw(desc, field, ty, value, writer)?,
        }
    }
    Ok(())
}

fn encode_scalar(
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    value: &Value,
    writer: &mut Writer,
) -> CodecResult<()> {
    encode_scalar_raw(desc, field, &field.ty, value, writer)
}

/// Writes a scalar value with no tag, as used inside packed blocks.
fn encode_scalar_raw(
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    ty: &FieldType,
    value: &Value,
    writer: &mut Writer,
) -> CodecResult<()> {
    match (ty, value) {
        (FieldType::Bool, Value::Bool(v)) => writer.bool(*v),
        (FieldType::Int32, Value::I32(v)) => writer.int32(*v),
        (FieldType::Int64, Value::I64(v)) => writer.int64(*v),
        (FieldType::Uint32, Value::U32(v)) => writer.varint32(*v),
        (FieldType::Uint64, Value::U64(v)) => writer.varint64(*v),
        (FieldType::Sint32, Value::I32(v)) => writer.sint32(*v),
        (FieldType::Sint64, Value::I64(v)) => writer.sint64(*v),
        (FieldType::Fixed32, Value::U32(v)) => writer.fixed32(*v),
        (FieldType::Fixed64, Value::U64(v)) => writer.fixed64(*v),
        (FieldType::Sfixed32, Value::I32(v)) => writer.sfixed32(*v),
        (FieldType::Sfixed64, Value::I64(v)) => writer.sfixed64(*v),
        (FieldType::Float, Value::F32(v)) => writer.float(*v),
        (FieldType::Double, Value::F64(v)) => writer.double(*v),
        (FieldType::Enum(_), Value::Enum(v)) => writer.int32(*v),
        (ty, other) => return Err(mismatch_ty(desc, field, ty, other)),
    }
    Ok(())
}

fn mismatch(
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    expected: &'static str,
    found: &Value,
) -> CodecError {
    CodecError::TypeMismatch {
        path: format!("{}.{}", desc.name, field.name),
        expected,
        found: found.kind(),
    }
}

fn mismatch_ty(
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    ty: &FieldType,
    found: &Value,
) -> CodecError {
    let expected = match ty {
        FieldType::Bool => "bool",
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => "i32",
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => "i64",
        FieldType::Uint32 | FieldType::Fixed32 => "u32",
        FieldType::Uint64 | FieldType::Fixed64 => "u64",
        FieldType::Float => "f32",
        FieldType::Double => "f64",
        FieldType::String => "string",
        FieldType::Bytes => "bytes",
        FieldType::Enum(_) => "enum",
        FieldType::Message(_) | FieldType::Map { .. } => "message",
    };
    mismatch(desc, field, expected, found)
}
