//! Schema-driven message codec.
//!
//! Where `wire` moves raw bytes and `schema` describes shapes, this crate
//! connects the two: a [`MessageValue`] is a dynamically-typed message
//! instance, and [`encode`]/[`decode`] walk a [`schema::MessageDescriptor`]
//! to move instances on and off the wire. [`verify`], [`from_json`] and
//! [`to_json`] bridge to loosely-typed plain objects.
//!
//! Decoding is forward compatible: fields the descriptor does not know are
//! skipped by wire type, and re-decoding never fails just because a peer
//! spoke a newer revision of the schema.

pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod value;
pub mod verify;

pub use convert::{from_json, to_json, BytesFormat, JsonOptions, LongFormat};
pub use decode::{decode, decode_from_slice};
pub use encode::{encode, encode_to_vec};
pub use error::{CodecError, CodecResult, ConvertReason};
pub use value::{default_value, is_default, MessageValue, Value};
pub use verify::verify;
