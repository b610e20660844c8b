//! 7-bit variable-length integers (unsigned LEB128) used to prefix the
//! header text.
//!
//! Lengths are limited to `i32::MAX`, so an encoding is at most 5 bytes.

use crate::bundler::{Error, Result};

/// Longest valid encoding of a header length.
pub const MAX_VARINT_LEN: usize = 5;

/// Appends `value` to `out`, least significant group first.
pub fn encode(value: u32, out: &mut Vec<u8>) {
    let mut remaining = value;
    while remaining >= 0x80 {
        out.push((remaining as u8 & 0x7f) | 0x80);
        remaining >>= 7;
    }
    out.push(remaining as u8);
}

/// Decodes a length prefix from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut value: u64 = 0;

    for (index, byte) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * index);
        if byte & 0x80 == 0 {
            return u32::try_from(value)
                .ok()
                .filter(|v| i32::try_from(*v).is_ok())
                .map(|v| (v, index + 1))
                .ok_or_else(|| {
                    Error::MalformedPackage(format!("header length {value} out of range"))
                });
        }
    }

    if bytes.len() < MAX_VARINT_LEN {
        Err(Error::MalformedPackage(
            "truncated header length prefix".to_string(),
        ))
    } else {
        Err(Error::MalformedPackage(
            "header length prefix longer than 5 bytes".to_string(),
        ))
    }
}
