//! Error types for wire-level encoding/decoding.

use std::fmt;

/// Result type for wire operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors that can occur while reading or writing the binary wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Attempted to read past the end of the buffer.
    Truncated {
        /// Number of bytes requested.
        needed: usize,
        /// Number of bytes available before the boundary.
        available: usize,
    },

    /// A varint did not terminate within its 10-byte budget.
    MalformedVarint,

    /// A tag carried an unsupported wire type value.
    InvalidWireType {
        /// The raw 3-bit wire type value.
        raw: u8,
    },

    /// A tag decoded to field number zero.
    InvalidTag {
        /// The full raw tag value.
        raw: u64,
    },

    /// A length-delimited field declared more bytes than the enclosing
    /// boundary holds.
    LengthOverrun {
        /// The declared length.
        length: usize,
        /// Bytes available before the boundary.
        available: usize,
    },

    /// A string field contained malformed UTF-8.
    InvalidUtf8,

    /// `finish` was called with at least one fork still open.
    UnclosedFork {
        /// Number of forks left open.
        open: usize,
    },

    /// A nested decode finished past its declared end boundary.
    MisalignedBoundary {
        /// Position after the nested decode.
        pos: usize,
        /// The declared end boundary.
        end: usize,
    },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { needed, available } => {
                write!(
                    f,
                    "truncated buffer: need {needed} bytes, have {available}"
                )
            }
            Self::MalformedVarint => {
                write!(f, "malformed varint: no terminating byte within 10 bytes")
            }
            Self::InvalidWireType { raw } => {
                write!(f, "invalid wire type {raw}")
            }
            Self::InvalidTag { raw } => {
                write!(f, "invalid tag 0x{raw:X}: field number is zero")
            }
            Self::LengthOverrun { length, available } => {
                write!(
                    f,
                    "declared length {length} overruns boundary with {available} bytes left"
                )
            }
            Self::InvalidUtf8 => {
                write!(f, "string field is not valid UTF-8")
            }
            Self::UnclosedFork { open } => {
                write!(f, "writer finished with {open} unclosed fork(s)")
            }
            Self::MisalignedBoundary { pos, end } => {
                write!(f, "nested decode ended at {pos}, past boundary {end}")
            }
        }
    }
}

impl std::error::Error for WireError {}
