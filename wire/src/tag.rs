//! Field tags and wire types.

use crate::error::{WireError, WireResult};

/// Highest field number the tag encoding can carry (2^29 - 1).
pub const MAX_FIELD_NUMBER: u32 = 0x1FFF_FFFF;

/// How the bytes following a tag are parsed.
///
/// The deprecated group wire types (3 and 4) are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Base-128 variable-length integer.
    Varint = 0,
    /// Eight little-endian bytes.
    Fixed64 = 1,
    /// Varint length followed by that many bytes.
    LengthDelimited = 2,
    /// Four little-endian bytes.
    Fixed32 = 5,
}

impl WireType {
    /// Converts a raw 3-bit wire type value.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }

    /// Returns the raw 3-bit value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// A field tag: field number plus wire type, packed as `(number << 3) | type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub field: u32,
    pub wire_type: WireType,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub const fn new(field: u32, wire_type: WireType) -> Self {
        Self { field, wire_type }
    }

    /// Packs the tag into its varint payload.
    #[must_use]
    pub const fn pack(self) -> u64 {
        ((self.field as u64) << 3) | self.wire_type.raw() as u64
    }

    /// Unpacks a decoded varint into a tag.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidTag`] for field number zero and
    /// [`WireError::InvalidWireType`] for wire types 3, 4, 6, and 7.
    pub fn unpack(raw: u64) -> WireResult<Self> {
        let wire_type = WireType::from_raw((raw & 0x7) as u8)
            .ok_or(WireError::InvalidWireType { raw: (raw & 0x7) as u8 })?;
        let field = raw >> 3;
        if field == 0 || field > u64::from(MAX_FIELD_NUMBER) {
            return Err(WireError::InvalidTag { raw });
        }
        Ok(Self {
            field: field as u32,
            wire_type,
        })
    }
}
