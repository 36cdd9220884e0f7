//! Field types and field descriptors.

use wire::WireType;

/// The declared type of a field (representation only).
///
/// Message and enum references are by fully-qualified name, resolved through
/// the registry. Map fields are schema sugar for a repeated two-field entry
/// message (key = field 1, value = field 2).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Float,
    Double,
    String,
    Bytes,
    /// Enum reference by name.
    Enum(String),
    /// Message reference by name.
    Message(String),
    /// Map field; key is restricted to integral/string types by convention.
    Map {
        key: Box<FieldType>,
        value: Box<FieldType>,
    },
}

impl FieldType {
    /// Returns the wire type values of this type are encoded with.
    ///
    /// Map fields answer as their entry messages (length-delimited).
    #[must_use]
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Bool
            | Self::Int32
            | Self::Int64
            | Self::Uint32
            | Self::Uint64
            | Self::Sint32
            | Self::Sint64
            | Self::Enum(_) => WireType::Varint,
            Self::Fixed64 | Self::Sfixed64 | Self::Double => WireType::Fixed64,
            Self::String | Self::Bytes | Self::Message(_) | Self::Map { .. } => {
                WireType::LengthDelimited
            }
            Self::Fixed32 | Self::Sfixed32 | Self::Float => WireType::Fixed32,
        }
    }

    /// Returns `true` for scalar numeric/enum types eligible for packed
    /// repeated encoding.
    #[must_use]
    pub fn is_packable(&self) -> bool {
        !matches!(
            self,
            Self::String | Self::Bytes | Self::Message(_) | Self::Map { .. }
        )
    }
}

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Label {
    Singular,
    Repeated,
}

/// A field declaration within a message.
///
/// Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDescriptor {
    /// Field number, unique within the message.
    pub number: u32,
    /// Field name as declared in the schema source.
    pub name: String,
    /// Declared type.
    pub ty: FieldType,
    /// Singular or repeated.
    pub label: Label,
    /// Index into the message's oneof list, if any.
    pub oneof: Option<usize>,
    /// Packed encoding for repeated packable fields. Ignored for singular
    /// fields and non-packable types.
    pub packed: bool,
}

impl FieldDescriptor {
    /// Creates a singular field.
    #[must_use]
    pub fn new(number: u32, name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            number,
            name: name.into(),
            ty,
            label: Label::Singular,
            oneof: None,
            packed: false,
        }
    }

    /// Creates a repeated field. Packable types default to packed encoding.
    #[must_use]
    pub fn repeated(number: u32, name: impl Into<String>, ty: FieldType) -> Self {
        let packed = ty.is_packable();
        Self {
            number,
            name: name.into(),
            ty,
            label: Label::Repeated,
            oneof: None,
            packed,
        }
    }

    /// Creates a map field.
    #[must_use]
    pub fn map(number: u32, name: impl Into<String>, key: FieldType, value: FieldType) -> Self {
        Self {
            number,
            name: name.into(),
            ty: FieldType::Map {
                key: Box::new(key),
                value: Box::new(value),
            },
            label: Label::Repeated,
            oneof: None,
            packed: false,
        }
    }

    /// Places the field inside the oneof at `index`.
    #[must_use]
    pub fn in_oneof(mut self, index: usize) -> Self {
        self.oneof = Some(index);
        self
    }

    /// Declares legacy unpacked encoding for a repeated packable field.
    #[must_use]
    pub fn unpacked(mut self) -> Self {
        self.packed = false;
        self
    }

    /// Returns `true` if the field is repeated (maps included).
    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    /// Returns `true` if the field is encoded as a packed block.
    #[must_use]
    pub fn is_packed(&self) -> bool {
        self.is_repeated() && self.packed && self.ty.is_packable()
    }
}
