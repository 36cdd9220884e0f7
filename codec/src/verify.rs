//! Decode-free structural validation of plain objects.

use schema::{FieldDescriptor, FieldType, Label, MessageDescriptor, Registry};
use serde_json::Value as Json;

use crate::convert::decode_base64;

/// Structurally checks a plain object against a message descriptor.
///
/// Returns `None` when the object could be converted and encoded, or a
/// path-qualified reason string (`"Coin.amount: string expected"`). Unknown
/// keys are ignored; `null` counts as absent. This never panics and never
/// converts; callers use it to vet input before `from_json`/`encode`.
#[must_use]
pub fn verify(desc: &MessageDescriptor, registry: &Registry, object: &Json) -> Option<String> {
    verify_at(desc, registry, object, &desc.name)
}

fn verify_at(
    desc: &MessageDescriptor,
    registry: &Registry,
    object: &Json,
    path: &str,
) -> Option<String> {
    let Json::Object(map) = object else {
        return Some(format!("{path}: object expected"));
    };

    // Oneof exclusivity: at most one member key per group may be populated.
    for (index, oneof) in desc.oneofs.iter().enumerate() {
        let populated = desc
            .fields
            .iter()
            .filter(|f| f.oneof == Some(index))
            .filter(|f| matches!(map.get(&f.name), Some(v) if !v.is_null()))
            .count();
        if populated > 1 {
            return Some(format!(
                "{path}.{}: at most one member may be set",
                oneof.name
            ));
        }
    }

    for field in &desc.fields {
        let Some(value) = map.get(&field.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let field_path = format!("{path}.{}", field.name);
        if let Some(reason) = verify_field(field, registry, value, &field_path) {
            return Some(reason);
        }
    }
    None
}

fn verify_field(
    field: &FieldDescriptor,
    registry: &Registry,
    value: &Json,
    path: &str,
) -> Option<String> {
    if let FieldType::Map { key, value: val_ty } = &field.ty {
        let Json::Object(map) = value else {
            return Some(format!("{path}: object expected"));
        };
        for (k, v) in map {
            let entry_path = format!("{path}[{k:?}]");
            if let Some(reason) = verify_map_key(key, k, &entry_path) {
                return Some(reason);
            }
            if let Some(reason) = verify_scalar(val_ty, registry, v, &entry_path) {
                return Some(reason);
            }
        }
        return None;
    }

    if field.label == Label::Repeated {
        let Json::Array(items) = value else {
            return Some(format!("{path}: array expected"));
        };
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{path}[{i}]");
            if let Some(reason) = verify_scalar(&field.ty, registry, item, &item_path) {
                return Some(reason);
            }
        }
        return None;
    }

    verify_scalar(&field.ty, registry, value, path)
}

/// JSON map keys are always strings; integer key types are parsed from text.
fn verify_map_key(ty: &FieldType, key: &str, path: &str) -> Option<String> {
    let ok = match ty {
        FieldType::String => true,
        FieldType::Bool => matches!(key, "true" | "false"),
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => key.parse::<i32>().is_ok(),
        FieldType::Uint32 | FieldType::Fixed32 => key.parse::<u32>().is_ok(),
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => key.parse::<i64>().is_ok(),
        FieldType::Uint64 | FieldType::Fixed64 => key.parse::<u64>().is_ok(),
        _ => false,
    };
    if ok {
        None
    } else {
        Some(format!("{path}: invalid map key"))
    }
}

fn verify_scalar(
    ty: &FieldType,
    registry: &Registry,
    value: &Json,
    path: &str,
) -> Option<String> {
    match ty {
        FieldType::Bool => {
            if !value.is_boolean() {
                return Some(format!("{path}: boolean expected"));
            }
        }
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => {
            let ok = value
                .as_i64()
                .is_some_and(|v| i32::try_from(v).is_ok());
            if !ok {
                return Some(format!("{path}: 32-bit integer expected"));
            }
        }
        FieldType::Uint32 | FieldType::Fixed32 => {
            let ok = value
                .as_u64()
                .is_some_and(|v| u32::try_from(v).is_ok());
            if !ok {
                return Some(format!("{path}: unsigned 32-bit integer expected"));
            }
        }
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => {
            let ok = match value {
                Json::Number(n) => n.as_i64().is_some(),
                Json::String(s) => s.parse::<i64>().is_ok(),
                _ => false,
            };
            if !ok {
                return Some(format!("{path}: 64-bit integer (number or string) expected"));
            }
        }
        FieldType::Uint64 | FieldType::Fixed64 => {
            let ok = match value {
                Json::Number(n) => n.as_u64().is_some(),
                Json::String(s) => s.parse::<u64>().is_ok(),
                _ => false,
            };
            if !ok {
                return Some(format!(
                    "{path}: unsigned 64-bit integer (number or string) expected"
                ));
            }
        }
        FieldType::Float | FieldType::Double => {
            if !value.is_number() {
                return Some(format!("{path}: number expected"));
            }
        }
        FieldType::String => {
            if !value.is_string() {
                return Some(format!("{path}: string expected"));
            }
        }
        FieldType::Bytes => {
            let ok = match value {
                Json::String(s) => decode_base64(s).is_ok(),
                Json::Array(items) => items
                    .iter()
                    .all(|v| v.as_u64().is_some_and(|b| b <= 255)),
                _ => false,
            };
            if !ok {
                return Some(format!("{path}: base64 string or byte array expected"));
            }
        }
        FieldType::Enum(name) => {
            let Some(enum_desc) = registry.enum_(name) else {
                return Some(format!("{path}: unknown enum type {name}"));
            };
            let ok = match value {
                Json::Number(n) => n
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .is_some_and(|v| enum_desc.contains(v)),
                Json::String(s) => enum_desc.number_of(s).is_some(),
                _ => false,
            };
            if !ok {
                return Some(format!("{path}: enum value expected"));
            }
        }
        FieldType::Message(name) => {
            let Some(nested) = registry.message(name) else {
                return Some(format!("{path}: unknown message type {name}"));
            };
            return verify_at(nested, registry, value, path);
        }
        FieldType::Map { .. } => {
            // Nested maps are not expressible in the schema model.
            return Some(format!("{path}: nested map not supported"));
        }
    }
    None
}
