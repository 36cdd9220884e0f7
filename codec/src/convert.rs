//! Plain-object and JSON conversion.
//!
//! The loosely-typed side of the type registry: a `serde_json::Value` map in,
//! a typed [`MessageValue`] out, and back. 64-bit integers cross the boundary
//! as numbers or decimal strings, byte fields as base64 text or number
//! arrays.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use schema::{FieldDescriptor, FieldType, Label, MessageDescriptor, Registry};
use serde_json::{json, Map, Value as Json};

use crate::error::{CodecError, CodecResult, ConvertReason};
use crate::value::{default_value, is_default, MessageValue, Value};

/// How 64-bit integers are emitted by [`to_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongFormat {
    /// Decimal strings; lossless for the full 64-bit range.
    #[default]
    String,
    /// JSON numbers.
    Number,
}

/// How byte fields are emitted by [`to_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BytesFormat {
    /// Standard base64 text.
    #[default]
    Base64,
    /// Arrays of numbers 0..=255.
    Array,
}

/// Options controlling [`to_json`] output.
///
/// The default (longs as strings, bytes as base64, defaults omitted) is the
/// fixed-option `toJSON` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonOptions {
    pub longs: LongFormat,
    pub bytes: BytesFormat,
    /// Emit singular scalar fields even at their zero value.
    pub emit_defaults: bool,
}

pub(crate) fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64.decode(text)
}

/// Builds a typed instance from a plain object.
///
/// 64-bit fields accept numbers or decimal strings, bytes accept base64 or
/// number arrays, enums accept declared names or numbers, maps accept JSON
/// objects. Unknown keys and `null` values are ignored.
pub fn from_json(
    desc: &MessageDescriptor,
    registry: &Registry,
    object: &Json,
) -> CodecResult<MessageValue> {
    from_json_at(desc, registry, object, &desc.name)
}

fn from_json_at(
    desc: &MessageDescriptor,
    registry: &Registry,
    object: &Json,
    path: &str,
) -> CodecResult<MessageValue> {
    let Json::Object(map) = object else {
        return Err(invalid(path, ConvertReason::Expected("object")));
    };

    let mut msg = MessageValue::new();
    for field in &desc.fields {
        let Some(value) = map.get(&field.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let field_path = format!("{path}.{}", field.name);
        convert_field(field, registry, value, &field_path, desc, &mut msg)?;
    }
    Ok(msg)
}

fn convert_field(
    field: &FieldDescriptor,
    registry: &Registry,
    value: &Json,
    path: &str,
    desc: &MessageDescriptor,
    msg: &mut MessageValue,
) -> CodecResult<()> {
    if let FieldType::Map { key, value: val_ty } = &field.ty {
        let Json::Object(entries) = value else {
            return Err(invalid(path, ConvertReason::Expected("object")));
        };
        for (k, v) in entries {
            let entry_path = format!("{path}[{k:?}]");
            let mut entry = MessageValue::new();
            entry.set_raw(1, parse_map_key(key, k, &entry_path)?);
            entry.set_raw(2, convert_scalar(val_ty, registry, v, &entry_path)?);
            msg.push(field.number, Value::Message(entry));
        }
        return Ok(());
    }

    if field.label == Label::Repeated {
        let Json::Array(items) = value else {
            return Err(invalid(path, ConvertReason::Expected("array")));
        };
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{path}[{i}]");
            let converted = convert_scalar(&field.ty, registry, item, &item_path)?;
            msg.push(field.number, converted);
        }
        return Ok(());
    }

    let converted = convert_scalar(&field.ty, registry, value, path)?;
    msg.set(desc, field.number, converted);
    Ok(())
}

fn convert_scalar(
    ty: &FieldType,
    registry: &Registry,
    value: &Json,
    path: &str,
) -> CodecResult<Value> {
    Ok(match ty {
        FieldType::Bool => Value::Bool(
            value
                .as_bool()
                .ok_or_else(|| invalid(path, ConvertReason::Expected("boolean")))?,
        ),
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => {
            let v = value
                .as_i64()
                .ok_or_else(|| invalid(path, ConvertReason::Expected("integer")))?;
            Value::I32(
                i32::try_from(v).map_err(|_| invalid(path, ConvertReason::OutOfRange))?,
            )
        }
        FieldType::Uint32 | FieldType::Fixed32 => {
            let v = value
                .as_u64()
                .ok_or_else(|| invalid(path, ConvertReason::Expected("unsigned integer")))?;
            Value::U32(
                u32::try_from(v).map_err(|_| invalid(path, ConvertReason::OutOfRange))?,
            )
        }
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => Value::I64(match value {
            Json::Number(n) => n
                .as_i64()
                .ok_or_else(|| invalid(path, ConvertReason::OutOfRange))?,
            Json::String(s) => s
                .parse()
                .map_err(|_| invalid(path, ConvertReason::Expected("decimal string")))?,
            _ => {
                return Err(invalid(
                    path,
                    ConvertReason::Expected("integer or decimal string"),
                ))
            }
        }),
        FieldType::Uint64 | FieldType::Fixed64 => Value::U64(match value {
            Json::Number(n) => n
                .as_u64()
                .ok_or_else(|| invalid(path, ConvertReason::OutOfRange))?,
            Json::String(s) => s
                .parse()
                .map_err(|_| invalid(path, ConvertReason::Expected("decimal string")))?,
            _ => {
                return Err(invalid(
                    path,
                    ConvertReason::Expected("integer or decimal string"),
                ))
            }
        }),
        FieldType::Float => Value::F32(
            value
                .as_f64()
                .ok_or_else(|| invalid(path, ConvertReason::Expected("number")))?
                as f32,
        ),
        FieldType::Double => Value::F64(
            value
                .as_f64()
                .ok_or_else(|| invalid(path, ConvertReason::Expected("number")))?,
        ),
        FieldType::String => Value::Str(
            value
                .as_str()
                .ok_or_else(|| invalid(path, ConvertReason::Expected("string")))?
                .to_string(),
        ),
        FieldType::Bytes => match value {
            Json::String(s) => Value::Bytes(
                decode_base64(s).map_err(|_| invalid(path, ConvertReason::InvalidBase64))?,
            ),
            Json::Array(items) => {
                let mut bytes = Vec::with_capacity(items.len());
                for item in items {
                    let b = item
                        .as_u64()
                        .and_then(|v| u8::try_from(v).ok())
                        .ok_or_else(|| invalid(path, ConvertReason::OutOfRange))?;
                    bytes.push(b);
                }
                Value::Bytes(bytes)
            }
            _ => {
                return Err(invalid(
                    path,
                    ConvertReason::Expected("base64 string or byte array"),
                ))
            }
        },
        FieldType::Enum(name) => {
            let enum_desc = registry
                .enum_(name)
                .ok_or_else(|| CodecError::UnknownType { name: name.clone() })?;
            match value {
                Json::Number(n) => {
                    let number = n
                        .as_i64()
                        .and_then(|v| i32::try_from(v).ok())
                        .ok_or_else(|| invalid(path, ConvertReason::OutOfRange))?;
                    if !enum_desc.contains(number) {
                        return Err(invalid(path, ConvertReason::UnknownEnumValue(number)));
                    }
                    Value::Enum(number)
                }
                Json::String(s) => Value::Enum(enum_desc.number_of(s).ok_or_else(|| {
                    invalid(path, ConvertReason::UnknownEnumName(s.clone()))
                })?),
                _ => {
                    return Err(invalid(
                        path,
                        ConvertReason::Expected("enum name or number"),
                    ))
                }
            }
        }
        FieldType::Message(name) => {
            let nested_desc = registry
                .message(name)
                .ok_or_else(|| CodecError::UnknownType { name: name.clone() })?;
            Value::Message(from_json_at(nested_desc, registry, value, path)?)
        }
        FieldType::Map { .. } => {
            return Err(invalid(path, ConvertReason::Expected("scalar map value")))
        }
    })
}

fn parse_map_key(ty: &FieldType, key: &str, path: &str) -> CodecResult<Value> {
    Ok(match ty {
        FieldType::String => Value::Str(key.to_string()),
        FieldType::Bool => match key {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(invalid(path, ConvertReason::Expected("boolean key"))),
        },
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => Value::I32(
            key.parse()
                .map_err(|_| invalid(path, ConvertReason::Expected("integer key")))?,
        ),
        FieldType::Uint32 | FieldType::Fixed32 => Value::U32(
            key.parse()
                .map_err(|_| invalid(path, ConvertReason::Expected("integer key")))?,
        ),
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => Value::I64(
            key.parse()
                .map_err(|_| invalid(path, ConvertReason::Expected("integer key")))?,
        ),
        FieldType::Uint64 | FieldType::Fixed64 => Value::U64(
            key.parse()
                .map_err(|_| invalid(path, ConvertReason::Expected("integer key")))?,
        ),
        _ => return Err(invalid(path, ConvertReason::Expected("scalar map key"))),
    })
}

/// Converts a typed instance back to a plain object.
pub fn to_json(
    desc: &MessageDescriptor,
    registry: &Registry,
    msg: &MessageValue,
    options: &JsonOptions,
) -> CodecResult<Json> {
    to_json_at(desc, registry, msg, options, &desc.name)
}

fn to_json_at(
    desc: &MessageDescriptor,
    registry: &Registry,
    msg: &MessageValue,
    options: &JsonOptions,
    path: &str,
) -> CodecResult<Json> {
    let mut out = Map::new();
    for field in &desc.fields {
        let field_path = format!("{path}.{}", field.name);
        if let FieldType::Map { key, value: val_ty } = &field.ty {
            let entries = msg.get_repeated(field.number);
            if entries.is_empty() && !options.emit_defaults {
                continue;
            }
            let mut map = Map::new();
            for entry in entries {
                let Value::Message(entry) = entry else {
                    return Err(type_mismatch(&field_path, "map entry", entry));
                };
                let key_value = entry
                    .get(1)
                    .cloned()
                    .unwrap_or_else(|| default_value(key));
                let val_value = entry
                    .get(2)
                    .cloned()
                    .unwrap_or_else(|| default_value(val_ty));
                let key_text = map_key_text(&key_value);
                let json_value =
                    emit_scalar(val_ty, registry, &val_value, options, &field_path)?;
                map.insert(key_text, json_value);
            }
            out.insert(field.name.clone(), Json::Object(map));
            continue;
        }

        if field.is_repeated() {
            let values = msg.get_repeated(field.number);
            if values.is_empty() && !options.emit_defaults {
                continue;
            }
            let mut items = Vec::with_capacity(values.len());
            for value in values {
                items.push(emit_scalar(&field.ty, registry, value, options, &field_path)?);
            }
            out.insert(field.name.clone(), Json::Array(items));
            continue;
        }

        match msg.get(field.number) {
            Some(value) => {
                if field.oneof.is_none()
                    && !options.emit_defaults
                    && is_default(&field.ty, value)
                {
                    continue;
                }
                let json_value = emit_scalar(&field.ty, registry, value, options, &field_path)?;
                out.insert(field.name.clone(), json_value);
            }
            None => {
                if options.emit_defaults && field.oneof.is_none() {
                    let value = default_value(&field.ty);
                    let json_value =
                        emit_scalar(&field.ty, registry, &value, options, &field_path)?;
                    out.insert(field.name.clone(), json_value);
                }
            }
        }
    }
    Ok(Json::Object(out))
}

fn map_key_text(value: &Value) -> String {
    match value {
        Value::Str(v) => v.clone(),
        Value::Bool(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        _ => String::new(),
    }
}

fn emit_scalar(
    ty: &FieldType,
    registry: &Registry,
    value: &Value,
    options: &JsonOptions,
    path: &str,
) -> CodecResult<Json> {
    Ok(match (ty, value) {
        (FieldType::Bool, Value::Bool(v)) => json!(v),
        (
            FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32,
            Value::I32(v),
        ) => json!(v),
        (FieldType::Uint32 | FieldType::Fixed32, Value::U32(v)) => json!(v),
        (
            FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64,
            Value::I64(v),
        ) => match options.longs {
            LongFormat::String => json!(v.to_string()),
            LongFormat::Number => json!(v),
        },
        (FieldType::Uint64 | FieldType::Fixed64, Value::U64(v)) => match options.longs {
            LongFormat::String => json!(v.to_string()),
            LongFormat::Number => json!(v),
        },
        (FieldType::Float, Value::F32(v)) => json!(v),
        (FieldType::Double, Value::F64(v)) => json!(v),
        (FieldType::String, Value::Str(v)) => json!(v),
        (FieldType::Bytes, Value::Bytes(v)) => match options.bytes {
            BytesFormat::Base64 => json!(BASE64.encode(v)),
            BytesFormat::Array => json!(v),
        },
        (FieldType::Enum(name), Value::Enum(v)) => {
            let enum_desc = registry
                .enum_(name)
                .ok_or_else(|| CodecError::UnknownType { name: name.clone() })?;
            match enum_desc.name_of(*v) {
                Some(name) => json!(name),
                None => json!(v),
            }
        }
        (FieldType::Message(name), Value::Message(nested)) => {
            let nested_desc = registry
                .message(name)
                .ok_or_else(|| CodecError::UnknownType { name: name.clone() })?;
            to_json_at(nested_desc, registry, nested, options, path)?
        }
        (_, other) => return Err(type_mismatch(path, "declared field type", other)),
    })
}

fn invalid(path: &str, reason: ConvertReason) -> CodecError {
    CodecError::InvalidValue {
        path: path.to_string(),
        reason,
    }
}

fn type_mismatch(path: &str, expected: &'static str, found: &Value) -> CodecError {
    CodecError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{EnumDescriptor, OneofDescriptor};
    use serde_json::json;

    fn registry() -> Registry {
        Registry::builder()
            .message(
                MessageDescriptor::new("Coin")
                    .field(FieldDescriptor::new(1, "denom", FieldType::String))
                    .field(FieldDescriptor::new(2, "amount", FieldType::String)),
            )
            .message(
                MessageDescriptor::new("Failure")
                    .field(FieldDescriptor::new(1, "address", FieldType::String))
                    .field(FieldDescriptor::new(2, "id", FieldType::Uint64))
                    .field(FieldDescriptor::new(3, "sudo_payload", FieldType::Bytes)),
            )
            .message(
                MessageDescriptor::new("Pubkey")
                    .oneof(OneofDescriptor::new("sum"))
                    .field(FieldDescriptor::new(1, "ed25519", FieldType::Bytes).in_oneof(0))
                    .field(FieldDescriptor::new(2, "secp256k1", FieldType::Bytes).in_oneof(0)),
            )
            .message(
                MessageDescriptor::new("FeeInfo")
                    .field(FieldDescriptor::map(
                        1,
                        "rates",
                        FieldType::String,
                        FieldType::Uint64,
                    ))
                    .field(FieldDescriptor::new(
                        2,
                        "result",
                        FieldType::Enum("TxResult".into()),
                    )),
            )
            .enum_(
                EnumDescriptor::new("TxResult")
                    .value("TX_RESULT_UNSPECIFIED", 0)
                    .value("TX_RESULT_ACK", 1),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn from_json_builds_typed_instance() {
        let registry = registry();
        let desc = registry.message("Failure").unwrap();
        let object = json!({
            "address": "neutron1abc",
            "id": "42",
            "sudo_payload": "3q0=",
        });
        let msg = from_json(desc, &registry, &object).unwrap();
        assert_eq!(msg.get(1), Some(&Value::Str("neutron1abc".into())));
        assert_eq!(msg.get(2), Some(&Value::U64(42)));
        assert_eq!(msg.get(3), Some(&Value::Bytes(vec![0xDE, 0xAD])));
    }

    #[test]
    fn from_json_accepts_number_longs_and_byte_arrays() {
        let registry = registry();
        let desc = registry.message("Failure").unwrap();
        let object = json!({"id": 42, "sudo_payload": [222, 173]});
        let msg = from_json(desc, &registry, &object).unwrap();
        assert_eq!(msg.get(2), Some(&Value::U64(42)));
        assert_eq!(msg.get(3), Some(&Value::Bytes(vec![0xDE, 0xAD])));
    }

    #[test]
    fn from_json_ignores_unknown_keys_and_nulls() {
        let registry = registry();
        let desc = registry.message("Coin").unwrap();
        let object = json!({"denom": "untrn", "amount": null, "extra": true});
        let msg = from_json(desc, &registry, &object).unwrap();
        assert_eq!(msg.len(), 1);
    }

    #[test]
    fn from_json_bad_base64_is_path_qualified() {
        let registry = registry();
        let desc = registry.message("Failure").unwrap();
        let object = json!({"sudo_payload": "!!"});
        let err = from_json(desc, &registry, &object).unwrap_err();
        match err {
            CodecError::InvalidValue { path, reason } => {
                assert_eq!(path, "Failure.sudo_payload");
                assert_eq!(reason, ConvertReason::InvalidBase64);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn from_json_oneof_keeps_last_member() {
        let registry = registry();
        let desc = registry.message("Pubkey").unwrap();
        let object = json!({"ed25519": "qg==", "secp256k1": "uw=="});
        let msg = from_json(desc, &registry, &object).unwrap();
        // Declaration order: secp256k1 converts second and wins.
        assert_eq!(msg.oneof_case(desc, 0), Some(2));
        assert!(!msg.is_present(1));
    }

    #[test]
    fn to_json_defaults_longs_to_strings_and_bytes_to_base64() {
        let registry = registry();
        let desc = registry.message("Failure").unwrap();
        let mut msg = MessageValue::new();
        msg.set(desc, 1, Value::Str("neutron1abc".into()));
        msg.set(desc, 2, Value::U64(42));
        msg.set(desc, 3, Value::Bytes(vec![0xDE, 0xAD]));
        let object = to_json(desc, &registry, &msg, &JsonOptions::default()).unwrap();
        assert_eq!(
            object,
            json!({"address": "neutron1abc", "id": "42", "sudo_payload": "3q0="})
        );
    }

    #[test]
    fn to_json_number_longs_and_array_bytes() {
        let registry = registry();
        let desc = registry.message("Failure").unwrap();
        let mut msg = MessageValue::new();
        msg.set(desc, 2, Value::U64(42));
        msg.set(desc, 3, Value::Bytes(vec![1, 2]));
        let options = JsonOptions {
            longs: LongFormat::Number,
            bytes: BytesFormat::Array,
            emit_defaults: false,
        };
        let object = to_json(desc, &registry, &msg, &options).unwrap();
        assert_eq!(object, json!({"id": 42, "sudo_payload": [1, 2]}));
    }

    #[test]
    fn to_json_emit_defaults() {
        let registry = registry();
        let desc = registry.message("Coin").unwrap();
        let options = JsonOptions {
            emit_defaults: true,
            ..JsonOptions::default()
        };
        let object = to_json(desc, &registry, &MessageValue::new(), &options).unwrap();
        assert_eq!(object, json!({"denom": "", "amount": ""}));
    }

    #[test]
    fn map_and_enum_roundtrip_through_json() {
        let registry = registry();
        let desc = registry.message("FeeInfo").unwrap();
        let object = json!({
            "rates": {"untrn": "100", "uatom": 7},
            "result": "TX_RESULT_ACK",
        });
        let msg = from_json(desc, &registry, &object).unwrap();
        assert_eq!(msg.get_repeated(1).len(), 2);
        assert_eq!(msg.get(2), Some(&Value::Enum(1)));

        let back = to_json(desc, &registry, &msg, &JsonOptions::default()).unwrap();
        assert_eq!(
            back,
            json!({
                "rates": {"untrn": "100", "uatom": "7"},
                "result": "TX_RESULT_ACK",
            })
        );
    }
}
