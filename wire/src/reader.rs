//! Bounds-checked cursor for decoding.

use crate::error::{WireError, WireResult};
use crate::tag::{Tag, WireType};
use crate::varint::{zigzag_decode32, zigzag_decode64, MAX_VARINT_BYTES};

/// A bounds-checked cursor over a byte sequence.
///
/// Maintains `pos <= end <= data.len()`. Every read is checked against `end`
/// and fails with [`WireError::Truncated`] rather than panicking. Nested
/// length-delimited regions are decoded by narrowing `end` with
/// [`limit`](Self::limit) and restoring it afterwards.
#[derive(Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader over the whole slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    /// Returns the current absolute position.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes before the current boundary.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Returns `true` when the cursor sits exactly on the boundary.
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.pos == self.end
    }

    /// Narrows the end boundary to `len` bytes from the current position,
    /// returning the prior boundary for [`restore`](Self::restore).
    ///
    /// # Errors
    ///
    /// Returns [`WireError::LengthOverrun`] if `len` exceeds the bytes left
    /// inside the current boundary.
    pub fn limit(&mut self, len: usize) -> WireResult<usize> {
        if len > self.remaining() {
            return Err(WireError::LengthOverrun {
                length: len,
                available: self.remaining(),
            });
        }
        let prior = self.end;
        self.end = self.pos + len;
        Ok(prior)
    }

    /// Restores a boundary previously returned by [`limit`](Self::limit).
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MisalignedBoundary`] if the cursor is not exactly
    /// on the narrowed boundary, which indicates a nested length that did not
    /// match its content.
    pub fn restore(&mut self, prior: usize) -> WireResult<()> {
        if self.pos != self.end {
            return Err(WireError::MisalignedBoundary {
                pos: self.pos,
                end: self.end,
            });
        }
        self.end = prior;
        Ok(())
    }

    fn take(&mut self, n: usize) -> WireResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(WireError::Truncated {
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads a 64-bit unsigned varint.
    pub fn varint64(&mut self) -> WireResult<u64> {
        let mut value = 0u64;
        for i in 0..MAX_VARINT_BYTES {
            if self.pos + i >= self.end {
                return Err(WireError::Truncated {
                    needed: i + 1,
                    available: self.remaining(),
                });
            }
            let byte = self.data[self.pos + i];
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                self.pos += i + 1;
                return Ok(value);
            }
        }
        Err(WireError::MalformedVarint)
    }

    /// Reads a 32-bit unsigned varint, discarding high bits like `uint32`
    /// fields do on the wire.
    pub fn varint32(&mut self) -> WireResult<u32> {
        Ok(self.varint64()? as u32)
    }

    /// Reads an `int32` field value.
    pub fn int32(&mut self) -> WireResult<i32> {
        Ok(self.varint64()? as i32)
    }

    /// Reads an `int64` field value.
    pub fn int64(&mut self) -> WireResult<i64> {
        Ok(self.varint64()? as i64)
    }

    /// Reads a zig-zag encoded `sint32` field value.
    pub fn sint32(&mut self) -> WireResult<i32> {
        Ok(zigzag_decode32(self.varint32()?))
    }

    /// Reads a zig-zag encoded `sint64` field value.
    pub fn sint64(&mut self) -> WireResult<i64> {
        Ok(zigzag_decode64(self.varint64()?))
    }

    /// Reads a boolean; any nonzero varint is `true`.
    pub fn bool(&mut self) -> WireResult<bool> {
        Ok(self.varint64()? != 0)
    }

    /// Reads the next field tag.
    pub fn tag(&mut self) -> WireResult<Tag> {
        let raw = self.varint64()?;
        Tag::unpack(raw)
    }

    /// Reads four little-endian bytes.
    pub fn fixed32(&mut self) -> WireResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap_or([0; 4])))
    }

    /// Reads eight little-endian bytes.
    pub fn fixed64(&mut self) -> WireResult<u64> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap_or([0; 8])))
    }

    /// Reads a signed 32-bit fixed-width value.
    pub fn sfixed32(&mut self) -> WireResult<i32> {
        Ok(self.fixed32()? as i32)
    }

    /// Reads a signed 64-bit fixed-width value.
    pub fn sfixed64(&mut self) -> WireResult<i64> {
        Ok(self.fixed64()? as i64)
    }

    /// Reads an IEEE-754 single-precision value.
    pub fn float(&mut self) -> WireResult<f32> {
        Ok(f32::from_bits(self.fixed32()?))
    }

    /// Reads an IEEE-754 double-precision value.
    pub fn double(&mut self) -> WireResult<f64> {
        Ok(f64::from_bits(self.fixed64()?))
    }

    /// Reads a length-prefixed byte slice.
    pub fn bytes(&mut self) -> WireResult<&'a [u8]> {
        let len = self.varint64()?;
        if len > self.remaining() as u64 {
            return Err(WireError::LengthOverrun {
                length: usize::try_from(len).unwrap_or(usize::MAX),
                available: self.remaining(),
            });
        }
        self.take(len as usize)
    }

    /// Reads a length-prefixed UTF-8 string.
    ///
    /// Malformed UTF-8 fails the decode; no replacement characters are
    /// substituted.
    pub fn string(&mut self) -> WireResult<&'a str> {
        let bytes = self.bytes()?;
        std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8)
    }

    /// Skips a field's value according to its wire type.
    pub fn skip(&mut self, wire_type: WireType) -> WireResult<()> {
        match wire_type {
            WireType::Varint => {
                self.varint64()?;
            }
            WireType::Fixed64 => {
                self.take(8)?;
            }
            WireType::LengthDelimited => {
                self.bytes()?;
            }
            WireType::Fixed32 => {
                self.take(4)?;
            }
        }
        Ok(())
    }
}
