//! Address codec.
//!
//! MIX addresses are base-64 positional numbers, one digit per byte, most
//! significant first. An instruction's address and an index register both
//! hold two bytes plus a sign, giving the signed range `-4095..=4095`.

use crate::word::{Sign, WordError, BYTE_RADIX, CELL_BYTES};

/// Largest magnitude two bytes can hold.
pub const MAX_MAGNITUDE: u32 = BYTE_RADIX * BYTE_RADIX - 1;

/// Longest byte run [`decode`] accepts: ten six-bit digits fill 60 bits.
pub const MAX_DECODE_BYTES: usize = 10;

/// Decode bytes as an unsigned base-64 number.
///
/// # Panics
/// Panics if given more than [`MAX_DECODE_BYTES`] bytes.
pub fn decode(bytes: &[u8]) -> u64 {
    assert!(
        bytes.len() <= MAX_DECODE_BYTES,
        "{} bytes exceed the {}-byte decode limit",
        bytes.len(),
        MAX_DECODE_BYTES
    );
    bytes
        .iter()
        .fold(0u64, |acc, &b| acc * u64::from(BYTE_RADIX) + u64::from(b))
}

/// Decode at most a full cell's worth of bytes and apply `sign`.
pub fn decode_signed(sign: Sign, bytes: &[u8]) -> i32 {
    debug_assert!(bytes.len() <= CELL_BYTES);
    let magnitude = decode(bytes) as i32;
    match sign {
        Sign::Positive => magnitude,
        Sign::Negative => -magnitude,
    }
}

/// Encode a signed value into a sign and two bytes.
///
/// Zero always encodes as `+0`: the integer form cannot carry a negative
/// zero, so `decode_signed(Negative, [0, 0])` does not survive a round trip.
pub fn encode_signed(value: i32) -> Result<(Sign, [u8; 2]), WordError> {
    let magnitude = value.unsigned_abs();
    if magnitude > MAX_MAGNITUDE {
        return Err(WordError::AddressOverflow(value));
    }
    let sign = if value < 0 { Sign::Negative } else { Sign::Positive };
    let bytes = [
        (magnitude / BYTE_RADIX) as u8,
        (magnitude % BYTE_RADIX) as u8,
    ];
    Ok((sign, bytes))
}
