//! Append-only byte sink for encoding.

use crate::error::{WireError, WireResult};
use crate::tag::{Tag, WireType};
use crate::varint::{encode_varint, varint_len, zigzag_encode32, zigzag_encode64};

/// An appendable byte sink with position bookmarking for length-delimited
/// sub-regions.
///
/// One `Writer` instance serves exactly one encode call. Nested content is
/// written between [`fork`](Self::fork) and [`ldelim`](Self::ldelim): the
/// fork records the start position, and closing it patches the region's
/// varint-encoded length in front of the bytes written since.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
    /// Start positions of open forks, innermost last.
    forks: Vec<usize>,
}

impl Writer {
    /// Creates a new empty `Writer`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `Writer` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buf: Vec::with_capacity(bytes),
            forks: Vec::new(),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a field tag.
    pub fn tag(&mut self, field: u32, wire_type: WireType) {
        encode_varint(Tag::new(field, wire_type).pack(), &mut self.buf);
    }

    /// Writes a 32-bit unsigned varint.
    pub fn varint32(&mut self, value: u32) {
        encode_varint(u64::from(value), &mut self.buf);
    }

    /// Writes a 64-bit unsigned varint.
    pub fn varint64(&mut self, value: u64) {
        encode_varint(value, &mut self.buf);
    }

    /// Writes a signed 32-bit value as a two's-complement varint.
    ///
    /// Negative values are sign-extended to 64 bits and occupy 10 bytes,
    /// matching the wire representation of `int32` fields.
    pub fn int32(&mut self, value: i32) {
        encode_varint(i64::from(value) as u64, &mut self.buf);
    }

    /// Writes a signed 64-bit value as a two's-complement varint.
    pub fn int64(&mut self, value: i64) {
        encode_varint(value as u64, &mut self.buf);
    }

    /// Writes a zig-zag encoded signed 32-bit value.
    pub fn sint32(&mut self, value: i32) {
        encode_varint(u64::from(zigzag_encode32(value)), &mut self.buf);
    }

    /// Writes a zig-zag encoded signed 64-bit value.
    pub fn sint64(&mut self, value: i64) {
        encode_varint(zigzag_encode64(value), &mut self.buf);
    }

    /// Writes a boolean as a one-byte varint.
    pub fn bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Writes four little-endian bytes.
    pub fn fixed32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes eight little-endian bytes.
    pub fn fixed64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a signed 32-bit fixed-width value.
    pub fn sfixed32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a signed 64-bit fixed-width value.
    pub fn sfixed64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an IEEE-754 single-precision value.
    pub fn float(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an IEEE-754 double-precision value.
    pub fn double(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a length-prefixed byte slice.
    pub fn bytes(&mut self, value: &[u8]) {
        encode_varint(value.len() as u64, &mut self.buf);
        self.buf.extend_from_slice(value);
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn string(&mut self, value: &str) {
        self.bytes(value.as_bytes());
    }

    /// Writes raw bytes with no length prefix.
    ///
    /// Used for concatenating packed repeated elements inside a fork.
    pub fn raw(&mut self, value: &[u8]) {
        self.buf.extend_from_slice(value);
    }

    /// Opens a length-delimited sub-region at the current position.
    ///
    /// Every `fork` must be closed by a matching [`ldelim`](Self::ldelim)
    /// before [`finish`](Self::finish).
    pub fn fork(&mut self) {
        self.forks.push(self.buf.len());
    }

    /// Closes the innermost open fork, prefixing the region written since
    /// [`fork`](Self::fork) with its varint-encoded length.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnclosedFork`] with `open == 0` if no fork is
    /// open.
    pub fn ldelim(&mut self) -> WireResult<()> {
        let start = self
            .forks
            .pop()
            .ok_or(WireError::UnclosedFork { open: 0 })?;
        let len = self.buf.len() - start;
        let prefix_len = varint_len(len as u64);
        // Second pass: shift the region right and patch the length in front.
        self.buf.resize(self.buf.len() + prefix_len, 0);
        self.buf.copy_within(start..start + len, start + prefix_len);
        let mut prefix = Vec::with_capacity(prefix_len);
        encode_varint(len as u64, &mut prefix);
        self.buf[start..start + prefix_len].copy_from_slice(&prefix);
        Ok(())
    }

    /// Finishes writing and returns the byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnclosedFork`] if any fork is still open.
    pub fn finish(self) -> WireResult<Vec<u8>> {
        if !self.forks.is_empty() {
            return Err(WireError::UnclosedFork {
                open: self.forks.len(),
            });
        }
        Ok(self.buf)
    }
}
