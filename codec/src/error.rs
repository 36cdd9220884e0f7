//! Error types for codec operations.

use std::fmt;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during message encoding/decoding and conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Wire format error.
    Wire(wire::WireError),

    /// A descriptor references a type the registry does not hold.
    ///
    /// The registry validates references at build time, so this only occurs
    /// when descriptors and registry come from different builds.
    UnknownType { name: String },

    /// A value's runtime type does not match the field's declared type.
    TypeMismatch {
        /// Dotted path from the root message to the offending field.
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A plain-object value could not be converted to the declared type.
    InvalidValue {
        /// Dotted path from the root message to the offending field.
        path: String,
        reason: ConvertReason,
    },
}

/// Details for plain-object conversion failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertReason {
    /// The JSON value had the wrong shape.
    Expected(&'static str),
    /// A numeric value was outside the declared type's range.
    OutOfRange,
    /// A bytes field carried text that is not valid base64.
    InvalidBase64,
    /// An enum field carried a number outside the enum's domain.
    UnknownEnumValue(i32),
    /// An enum field carried a name the enum does not declare.
    UnknownEnumName(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::UnknownType { name } => {
                write!(f, "unknown type {name} in registry")
            }
            Self::TypeMismatch {
                path,
                expected,
                found,
            } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
            Self::InvalidValue { path, reason } => {
                write!(f, "{path}: {reason}")
            }
        }
    }
}

impl fmt::Display for ConvertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected(shape) => write!(f, "{shape} expected"),
            Self::OutOfRange => write!(f, "value out of range"),
            Self::InvalidBase64 => write!(f, "invalid base64"),
            Self::UnknownEnumValue(number) => write!(f, "unknown enum value {number}"),
            Self::UnknownEnumName(name) => write!(f, "unknown enum name {name:?}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wire::WireError> for CodecError {
    fn from(err: wire::WireError) -> Self {
        Self::Wire(err)
    }
}
