//! Message and enum descriptors.

use crate::field::FieldDescriptor;

/// A named oneof group within a message.
///
/// At most one member field of a oneof is populated at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneofDescriptor {
    pub name: String,
}

impl OneofDescriptor {
    /// Creates a oneof descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A message shape: an ordered list of field declarations plus oneof groups.
///
/// Loaded once from schema source and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageDescriptor {
    /// Fully-qualified message name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Oneof groups referenced by `FieldDescriptor::oneof` indices.
    pub oneofs: Vec<OneofDescriptor>,
}

impl MessageDescriptor {
    /// Creates an empty message descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            oneofs: Vec::new(),
        }
    }

    /// Adds a field declaration.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a oneof group; member fields reference it by index.
    #[must_use]
    pub fn oneof(mut self, oneof: OneofDescriptor) -> Self {
        self.oneofs.push(oneof);
        self
    }

    /// Looks up a field by number.
    #[must_use]
    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the numbers of all member fields of the oneof at `index`.
    pub fn oneof_members(&self, index: usize) -> impl Iterator<Item = u32> + '_ {
        self.fields
            .iter()
            .filter(move |f| f.oneof == Some(index))
            .map(|f| f.number)
    }
}

/// An enum shape: named values with declared numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDescriptor {
    /// Fully-qualified enum name.
    pub name: String,
    /// `(name, number)` pairs in declaration order.
    pub values: Vec<(String, i32)>,
}

impl EnumDescriptor {
    /// Creates an empty enum descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Adds a value.
    #[must_use]
    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push((name.into(), number));
        self
    }

    /// Returns `true` if `number` is a declared value.
    #[must_use]
    pub fn contains(&self, number: i32) -> bool {
        self.values.iter().any(|(_, n)| *n == number)
    }

    /// Returns the declared name for `number`.
    #[must_use]
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, n)| *n == number)
            .map(|(name, _)| name.as_str())
    }

    /// Returns the declared number for `name`.
    #[must_use]
    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, number)| *number)
    }
}
