//! Tag, varint, and byte-level reader/writer primitives for the pbrun runtime.
//!
//! This crate handles the binary wire format shared by every message shape:
//! varint and zig-zag integer encoding, field tags with their 3-bit wire
//! types, a growable [`Writer`] with fork/join length-delimited regions, and
//! a bounds-checked [`Reader`]. It knows nothing about schemas or field
//! layouts, only bytes.
//!
//! # Design Principles
//!
//! - **Bounded decoding** - Every read is checked against the cursor boundary;
//!   malformed input returns an error, never a panic.
//! - **Minimal encode, permissive decode** - Encoding always emits the
//!   shortest varint; decoding accepts non-minimal forms from other encoders.
//! - **No domain knowledge** - Field semantics live in the schema and codec
//!   crates.

mod error;
mod reader;
mod tag;
mod varint;
mod writer;

pub use error::{WireError, WireResult};
pub use reader::Reader;
pub use tag::{Tag, WireType, MAX_FIELD_NUMBER};
pub use varint::{
    decode_varint, encode_varint, varint_len, zigzag_decode32, zigzag_decode64, zigzag_encode32,
    zigzag_encode64, MAX_VARINT_BYTES,
};
pub use writer::Writer;
