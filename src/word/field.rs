//! Field specifications.
//!
//! A field spec `(L:R)` selects a contiguous run of a cell: position 0 is the
//! sign, positions 1..=5 are the magnitude bytes. It travels inside an
//! instruction packed into one byte as `L * 8 + R`.

use std::fmt;
use std::ops::Range;
use serde::{Serialize, Deserialize};
use crate::word::{WordError, CELL_BYTES};

/// Split a packed field byte into `(left, right)`.
#[inline]
pub const fn unpack(m: u8) -> (u8, u8) {
    (m / 8, m % 8)
}

/// Pack `(left, right)` into a field byte.
#[inline]
pub const fn pack(left: u8, right: u8) -> u8 {
    left * 8 + right
}

/// A validated `(left:right)` byte range, `0 <= left <= right <= 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    left: u8,
    right: u8,
}

impl FieldSpec {
    /// `(0:5)`: sign and all five bytes.
    pub const WHOLE: FieldSpec = FieldSpec { left: 0, right: 5 };

    /// `(0:0)`: the sign alone.
    pub const SIGN: FieldSpec = FieldSpec { left: 0, right: 0 };

    pub fn new(left: u8, right: u8) -> Result<Self, WordError> {
        if left > right || right as usize > CELL_BYTES {
            return Err(WordError::InvalidFieldSpec { left, right });
        }
        Ok(Self { left, right })
    }

    /// Decode a packed field byte.
    pub fn from_byte(m: u8) -> Result<Self, WordError> {
        let (left, right) = unpack(m);
        Self::new(left, right)
    }

    #[inline]
    pub const fn to_byte(self) -> u8 {
        pack(self.left, self.right)
    }

    #[inline]
    pub const fn left(self) -> u8 {
        self.left
    }

    #[inline]
    pub const fn right(self) -> u8 {
        self.right
    }

    /// Whether position 0 (the sign) is part of the field.
    #[inline]
    pub const fn includes_sign(self) -> bool {
        self.left == 0
    }

    /// Number of magnitude bytes selected.
    #[inline]
    pub fn width(self) -> usize {
        self.byte_range().len()
    }

    /// Zero-based magnitude byte indices selected by this field.
    ///
    /// `left == 0` names the sign rather than a byte, so the byte run always
    /// starts at position `max(left, 1)`. Every field read and write goes
    /// through here.
    pub fn byte_range(self) -> Range<usize> {
        let first = self.left.max(1) as usize - 1;
        first..self.right as usize
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::WHOLE
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.left, self.right)
    }
}

impl TryFrom<u8> for FieldSpec {
    type Error = WordError;

    fn try_from(m: u8) -> Result<Self, Self::Error> {
        FieldSpec::from_byte(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        assert_eq!(unpack(11), (1, 3));
        assert_eq!(unpack(19), (2, 3));
        assert_eq!(unpack(5), (0, 5));
        assert_eq!(pack(2, 3), 19);
        for left in 0..=5 {
            for right in left..=5 {
                assert_eq!(unpack(pack(left, right)), (left, right));
            }
        }
    }

    #[test]
    fn test_invalid_specs() {
        assert_eq!(
            FieldSpec::new(3, 2),
            Err(WordError::InvalidFieldSpec { left: 3, right: 2 })
        );
        assert_eq!(
            FieldSpec::new(0, 6),
            Err(WordError::InvalidFieldSpec { left: 0, right: 6 })
        );
        // 7:7 packs to 63, unpacks fine but is out of range
        assert!(FieldSpec::from_byte(63).is_err());
    }

    #[test]
    fn test_byte_range() {
        assert_eq!(FieldSpec::WHOLE.byte_range(), 0..5);
        assert_eq!(FieldSpec::SIGN.byte_range(), 0..0);
        assert_eq!(FieldSpec::new(0, 3).unwrap().byte_range(), 0..3);
        assert_eq!(FieldSpec::new(1, 3).unwrap().byte_range(), 0..3);
        assert_eq!(FieldSpec::new(2, 3).unwrap().byte_range(), 1..3);
        assert_eq!(FieldSpec::new(5, 5).unwrap().byte_range(), 4..5);
    }

    #[test]
    fn test_sign_inclusion() {
        assert!(FieldSpec::SIGN.includes_sign());
        assert!(FieldSpec::WHOLE.includes_sign());
        assert!(!FieldSpec::new(1, 5).unwrap().includes_sign());
        assert_eq!(FieldSpec::SIGN.width(), 0);
        assert_eq!(FieldSpec::new(0, 1).unwrap().width(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldSpec::new(2, 3).unwrap().to_string(), "(2:3)");
        assert_eq!(FieldSpec::default(), FieldSpec::WHOLE);
    }
}
