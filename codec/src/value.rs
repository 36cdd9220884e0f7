//! Dynamic message instances.

use std::collections::BTreeMap;

use schema::{FieldType, MessageDescriptor};

/// A single decoded or caller-built field value.
///
/// 64-bit integers use the native `i64`/`u64` types; the signed/unsigned
/// distinction is carried by the field's declared type, not the value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Enum(i32),
    Message(MessageValue),
}

impl Value {
    /// Short name of the value's runtime type, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
        }
    }
}

/// Returns the proto3 zero value for a field type.
///
/// Unset singular scalar fields take this value rather than being considered
/// absent. Map fields answer as an empty message (entries are never
/// defaulted).
#[must_use]
pub fn default_value(ty: &FieldType) -> Value {
    match ty {
        FieldType::Bool => Value::Bool(false),
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => Value::I32(0),
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => Value::I64(0),
        FieldType::Uint32 | FieldType::Fixed32 => Value::U32(0),
        FieldType::Uint64 | FieldType::Fixed64 => Value::U64(0),
        FieldType::Float => Value::F32(0.0),
        FieldType::Double => Value::F64(0.0),
        FieldType::String => Value::Str(String::new()),
        FieldType::Bytes => Value::Bytes(Vec::new()),
        FieldType::Enum(_) => Value::Enum(0),
        FieldType::Message(_) | FieldType::Map { .. } => Value::Message(MessageValue::new()),
    }
}

/// Returns `true` if `value` is the proto3 zero value for `ty`.
#[must_use]
pub fn is_default(ty: &FieldType, value: &Value) -> bool {
    match (ty, value) {
        (FieldType::Bool, Value::Bool(v)) => !v,
        (
            FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32,
            Value::I32(v),
        ) => *v == 0,
        (
            FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64,
            Value::I64(v),
        ) => *v == 0,
        (FieldType::Uint32 | FieldType::Fixed32, Value::U32(v)) => *v == 0,
        (FieldType::Uint64 | FieldType::Fixed64, Value::U64(v)) => *v == 0,
        (FieldType::Float, Value::F32(v)) => *v == 0.0,
        (FieldType::Double, Value::F64(v)) => *v == 0.0,
        (FieldType::String, Value::Str(v)) => v.is_empty(),
        (FieldType::Bytes, Value::Bytes(v)) => v.is_empty(),
        (FieldType::Enum(_), Value::Enum(v)) => *v == 0,
        // Singular message fields have explicit presence; never defaulted out.
        _ => false,
    }
}

/// Storage for one populated field.
#[derive(Debug, Clone, PartialEq)]
enum FieldSlot {
    Single(Value),
    Repeated(Vec<Value>),
}

/// A dynamic message instance keyed by field number.
///
/// Instances are created per call, mutated by the caller or by decode, and
/// carry only a read-only relationship to their descriptor: operations that
/// need oneof grouping take the descriptor as a parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageValue {
    fields: BTreeMap<u32, FieldSlot>,
}

impl MessageValue {
    /// Creates an empty instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of populated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the field is populated.
    #[must_use]
    pub fn is_present(&self, number: u32) -> bool {
        self.fields.contains_key(&number)
    }

    /// Sets a singular field.
    ///
    /// If the field belongs to a oneof, the other members of that oneof are
    /// cleared first, so at most one member is ever present.
    pub fn set(&mut self, desc: &MessageDescriptor, number: u32, value: Value) {
        if let Some(field) = desc.field_by_number(number) {
            if let Some(index) = field.oneof {
                let siblings: Vec<u32> = desc
                    .oneof_members(index)
                    .filter(|&n| n != number)
                    .collect();
                for sibling in siblings {
                    self.fields.remove(&sibling);
                }
            }
        }
        self.fields.insert(number, FieldSlot::Single(value));
    }

    /// Sets a singular field without oneof bookkeeping.
    ///
    /// Used where no descriptor applies, such as synthesized map entries.
    pub fn set_raw(&mut self, number: u32, value: Value) {
        self.fields.insert(number, FieldSlot::Single(value));
    }

    /// Appends a value to a repeated field.
    pub fn push(&mut self, number: u32, value: Value) {
        match self.fields.entry(number) {
            std::collections::btree_map::Entry::Occupied(mut entry) => {
                match entry.get_mut() {
                    FieldSlot::Repeated(values) => values.push(value),
                    // A singular slot under a repeated number is replaced.
                    slot @ FieldSlot::Single(_) => {
                        *slot = FieldSlot::Repeated(vec![value]);
                    }
                }
            }
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(FieldSlot::Repeated(vec![value]));
            }
        }
    }

    /// Returns a singular field's value.
    #[must_use]
    pub fn get(&self, number: u32) -> Option<&Value> {
        match self.fields.get(&number)? {
            FieldSlot::Single(value) => Some(value),
            FieldSlot::Repeated(_) => None,
        }
    }

    /// Returns a repeated field's values; empty when unpopulated.
    #[must_use]
    pub fn get_repeated(&self, number: u32) -> &[Value] {
        match self.fields.get(&number) {
            Some(FieldSlot::Repeated(values)) => values,
            _ => &[],
        }
    }

    /// Clears a field's presence.
    pub fn clear(&mut self, number: u32) {
        self.fields.remove(&number);
    }

    /// Returns the field number of the populated member of the oneof at
    /// `index`, if any.
    #[must_use]
    pub fn oneof_case(&self, desc: &MessageDescriptor, index: usize) -> Option<u32> {
        desc.oneof_members(index).find(|&n| self.is_present(n))
    }

    /// Iterates over populated field numbers in ascending order.
    pub fn field_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.fields.keys().copied()
    }
}
