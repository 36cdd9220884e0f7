//! Message, enum, and service descriptors plus the type registry for the
//! pbrun runtime.
//!
//! This crate models the schema metadata the generated declaration surface is
//! reduced to: field numbers, wire types, cardinality, oneof grouping, and
//! service method tables. Descriptors are plain values built at startup and
//! frozen inside a [`Registry`]; the codec and rpc crates consume them
//! read-only.
//!
//! # Design Principles
//!
//! - **Explicit registry** - No process-global namespace; the registry is a
//!   value passed by reference to every codec and dispatcher call site.
//! - **Validated once** - Invariants (unique field numbers, resolvable type
//!   references, oneof shape) are checked at build time, not per call.
//! - **Schema, not semantics** - Field meaning is payload content; this crate
//!   never interprets it.

mod error;
mod field;
mod message;
mod registry;
mod service;

pub use error::{SchemaError, SchemaResult};
pub use field::{FieldDescriptor, FieldType, Label};
pub use message::{EnumDescriptor, MessageDescriptor, OneofDescriptor};
pub use registry::{Registry, RegistryBuilder};
pub use service::{MethodDescriptor, ServiceDescriptor};
