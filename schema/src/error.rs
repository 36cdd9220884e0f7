//! Error types for schema construction.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while building or validating a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two registered types share a fully-qualified name.
    DuplicateTypeName { name: String },

    /// Two fields in one message share a field number.
    DuplicateFieldNumber { message: String, number: u32 },

    /// A field number is zero, above the tag limit, or in the reserved range.
    InvalidFieldNumber { message: String, number: u32 },

    /// A field references a oneof index the message does not declare.
    InvalidOneofIndex {
        message: String,
        field: String,
        index: usize,
    },

    /// A repeated field was placed inside a oneof.
    RepeatedFieldInOneof { message: String, field: String },

    /// A field references a message or enum the registry does not hold.
    UnresolvedTypeReference {
        message: String,
        field: String,
        referenced: String,
    },

    /// An enum lacks the required zero value.
    MissingZeroValue { enum_name: String },

    /// A service method references a request or response message the
    /// registry does not hold.
    UnresolvedMethodType {
        service: String,
        method: String,
        referenced: String,
    },

    /// Two methods in one service share a name.
    DuplicateMethodName { service: String, method: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTypeName { name } => {
                write!(f, "duplicate type name {name}")
            }
            Self::DuplicateFieldNumber { message, number } => {
                write!(f, "duplicate field number {number} in {message}")
            }
            Self::InvalidFieldNumber { message, number } => {
                write!(f, "invalid field number {number} in {message}")
            }
            Self::InvalidOneofIndex {
                message,
                field,
                index,
            } => {
                write!(
                    f,
                    "field {message}.{field} references undeclared oneof index {index}"
                )
            }
            Self::RepeatedFieldInOneof { message, field } => {
                write!(f, "repeated field {message}.{field} cannot be in a oneof")
            }
            Self::UnresolvedTypeReference {
                message,
                field,
                referenced,
            } => {
                write!(
                    f,
                    "field {message}.{field} references unknown type {referenced}"
                )
            }
            Self::MissingZeroValue { enum_name } => {
                write!(f, "enum {enum_name} has no zero value")
            }
            Self::UnresolvedMethodType {
                service,
                method,
                referenced,
            } => {
                write!(
                    f,
                    "method {service}.{method} references unknown message {referenced}"
                )
            }
            Self::DuplicateMethodName { service, method } => {
                write!(f, "duplicate method {method} in service {service}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
