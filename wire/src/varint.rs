//! Variable-length integer encoding.
//!
//! Varints are little-endian base-128: seven payload bits per byte, low-order
//! group first, continuation bit `0x80` on every byte except the last. A
//! 64-bit value needs at most 10 bytes. Encoding always produces the minimal
//! form; decoding accepts any terminating form within the 10-byte budget, so
//! non-minimal input from other encoders round-trips through decode.

use crate::error::{WireError, WireResult};

/// Maximum encoded size of a 64-bit varint.
pub const MAX_VARINT_BYTES: usize = 10;

/// Returns the number of bytes the minimal encoding of `value` occupies.
#[must_use]
pub const fn varint_len(value: u64) -> usize {
    // 1 + floor(bits / 7), with 0 occupying one byte.
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0xFFF_FFFF => 4,
        0x1000_0000..=0x7_FFFF_FFFF => 5,
        0x8_0000_0000..=0x3FF_FFFF_FFFF => 6,
        0x400_0000_0000..=0x1_FFFF_FFFF_FFFF => 7,
        0x2_0000_0000_0000..=0xFF_FFFF_FFFF_FFFF => 8,
        0x100_0000_0000_0000..=0x7FFF_FFFF_FFFF_FFFF => 9,
        _ => 10,
    }
}

/// Appends the minimal varint encoding of `value` to `buf`.
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Decodes a varint from the front of `data`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
///
/// Returns [`WireError::MalformedVarint`] if no terminating byte appears
/// within 10 bytes, or [`WireError::Truncated`] if `data` ends mid-value.
pub fn decode_varint(data: &[u8]) -> WireResult<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in data.iter().enumerate().take(MAX_VARINT_BYTES) {
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    if data.len() < MAX_VARINT_BYTES {
        return Err(WireError::Truncated {
            needed: data.len() + 1,
            available: data.len(),
        });
    }
    Err(WireError::MalformedVarint)
}

/// Maps a signed 32-bit value to the zig-zag domain.
#[must_use]
pub const fn zigzag_encode32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode32`].
#[must_use]
pub const fn zigzag_decode32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Maps a signed 64-bit value to the zig-zag domain.
#[must_use]
pub const fn zigzag_encode64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode64`].
#[must_use]
pub const fn zigzag_decode64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        let (decoded, used) = decode_varint(&buf).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(used, buf.len());
        buf
    }

    #[test]
    fn encode_zero_is_one_byte() {
        assert_eq!(roundtrip(0), vec![0x00]);
    }

    #[test]
    fn encode_small_values() {
        assert_eq!(roundtrip(1), vec![0x01]);
        assert_eq!(roundtrip(127), vec![0x7F]);
    }

    #[test]
    fn encode_two_byte_boundary() {
        assert_eq!(roundtrip(128), vec![0x80, 0x01]);
        assert_eq!(roundtrip(300), vec![0xAC, 0x02]);
    }

    #[test]
    fn encode_u32_max() {
        assert_eq!(roundtrip(u64::from(u32::MAX)).len(), 5);
    }

    #[test]
    fn encode_u64_max_is_ten_bytes() {
        let buf = roundtrip(u64::MAX);
        assert_eq!(buf.len(), 10);
        assert_eq!(buf[9], 0x01);
    }

    #[test]
    fn no_realignment_at_32_bit_boundary() {
        // Bits flow straight through the low/high word split.
        let value = 1u64 << 35;
        let buf = roundtrip(value);
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn varint_len_matches_encoding() {
        for value in [
            0,
            1,
            127,
            128,
            16_383,
            16_384,
            u64::from(u32::MAX),
            u64::MAX,
        ] {
            let mut buf = Vec::new();
            encode_varint(value, &mut buf);
            assert_eq!(varint_len(value), buf.len(), "value {value}");
        }
    }

    #[test]
    fn decode_accepts_non_minimal_encoding() {
        // 1 encoded in two bytes: 0x81 0x00.
        let (value, used) = decode_varint(&[0x81, 0x00]).unwrap();
        assert_eq!(value, 1);
        assert_eq!(used, 2);
    }

    #[test]
    fn decode_truncated_mid_value() {
        let err = decode_varint(&[0x80]).unwrap_err();
        assert!(matches!(err, WireError::Truncated { .. }));
    }

    #[test]
    fn decode_exceeding_budget() {
        let err = decode_varint(&[0xFF; 11]).unwrap_err();
        assert_eq!(err, WireError::MalformedVarint);
    }

    #[test]
    fn decode_ten_byte_terminated() {
        let mut buf = vec![0xFF; 9];
        buf.push(0x01);
        let (value, used) = decode_varint(&buf).unwrap();
        assert_eq!(value, u64::MAX);
        assert_eq!(used, 10);
    }

    #[test]
    fn zigzag32_mapping() {
        assert_eq!(zigzag_encode32(0), 0);
        assert_eq!(zigzag_encode32(-1), 1);
        assert_eq!(zigzag_encode32(1), 2);
        assert_eq!(zigzag_encode32(-2), 3);
        assert_eq!(zigzag_encode32(i32::MAX), u32::MAX - 1);
        assert_eq!(zigzag_encode32(i32::MIN), u32::MAX);
    }

    #[test]
    fn zigzag64_roundtrip() {
        for value in [0i64, 1, -1, 42, -42, i64::MAX, i64::MIN] {
            assert_eq!(zigzag_decode64(zigzag_encode64(value)), value);
        }
    }

    #[test]
    fn zigzag32_roundtrip() {
        for value in [0i32, 1, -1, 300, -300, i32::MAX, i32::MIN] {
            assert_eq!(zigzag_decode32(zigzag_encode32(value)), value);
        }
    }
}
