//! Fixed-width MIX cells.
//!
//! This module provides the two cell widths used by the machine:
//! - `Cell`: five bytes plus sign, for memory, `A` and `X`
//! - `IndexCell`: two bytes plus sign, for `I1`..`I6`

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::word::{address, FieldSpec, Sign, WordError, BYTE_RADIX, CELL_BYTES, INDEX_BYTES};

/// A full word: five six-bit bytes plus a sign.
///
/// Byte 0 is the most significant. When a cell is read as an instruction:
/// - bytes 0..2: address magnitude
/// - byte 2: index register selector (0 = none)
/// - byte 3: packed field spec
/// - byte 4: opcode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    sign: Sign,
    bytes: [u8; CELL_BYTES],
}

/// An index register value: two bytes plus a sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IndexCell {
    sign: Sign,
    bytes: [u8; INDEX_BYTES],
}

/// Positions of the instruction fields inside a cell.
const ADDRESS: std::ops::Range<usize> = 0..2;
const INDEX: usize = 2;
const FIELD: usize = 3;
const OPCODE: usize = 4;

/// Cell positions an index cell occupies when widened.
const INDEX_SLOT: std::ops::Range<usize> = 3..5;

fn check_bytes(bytes: &[u8]) {
    for &b in bytes {
        assert!(
            (b as u32) < BYTE_RADIX,
            "Byte {} out of range for a MIX byte [0, {}]",
            b,
            BYTE_RADIX - 1
        );
    }
}

/// Parse `<sign> b b ...` with exactly `N` decimal bytes.
fn parse_signed_bytes<const N: usize>(s: &str) -> Result<(Sign, [u8; N]), WordError> {
    let mut tokens = s.split_whitespace();
    let sign = tokens
        .next()
        .ok_or_else(|| WordError::MalformedSign(String::new()))?
        .parse::<Sign>()?;

    let rest: Vec<&str> = tokens.collect();
    if rest.len() != N {
        return Err(WordError::WrongLength { expected: N, got: rest.len() });
    }

    let mut bytes = [0u8; N];
    for (slot, token) in bytes.iter_mut().zip(rest) {
        let value: u32 = token
            .parse()
            .map_err(|_| WordError::InvalidNumber(token.to_string()))?;
        if value >= BYTE_RADIX {
            return Err(WordError::ByteOutOfRange(value));
        }
        *slot = value as u8;
    }
    Ok((sign, bytes))
}

// ============================================================================
// Cell Implementation
// ============================================================================

impl Cell {
    /// Positive zero.
    pub const ZERO: Cell = Cell { sign: Sign::Positive, bytes: [0; CELL_BYTES] };

    /// Create a cell from a sign and five bytes.
    ///
    /// # Panics
    /// Panics if any byte is outside `0..=63`.
    pub fn new(sign: Sign, bytes: [u8; CELL_BYTES]) -> Self {
        check_bytes(&bytes);
        Self { sign, bytes }
    }

    #[inline]
    pub const fn sign(&self) -> Sign {
        self.sign
    }

    #[inline]
    pub fn set_sign(&mut self, sign: Sign) {
        self.sign = sign;
    }

    #[inline]
    pub const fn bytes(&self) -> &[u8; CELL_BYTES] {
        &self.bytes
    }

    /// The same magnitude with the opposite sign.
    #[inline]
    pub fn negated(mut self) -> Self {
        self.sign = self.sign.flip();
        self
    }

    /// True if every magnitude byte is zero, regardless of sign.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Read a field, right-aligned into a fresh cell.
    ///
    /// The result is positive unless the field includes the sign, in which
    /// case it takes this cell's sign.
    pub fn get_field(&self, spec: FieldSpec) -> Cell {
        let range = spec.byte_range();
        let width = range.len();
        let mut result = Cell::ZERO;
        if spec.includes_sign() {
            result.sign = self.sign;
        }
        result.bytes[CELL_BYTES - width..].copy_from_slice(&self.bytes[range]);
        result
    }

    /// Overwrite a field with the rightmost bytes of `value`.
    ///
    /// Bytes outside the field keep their contents; the sign only changes
    /// when the field includes it.
    pub fn set_field(&mut self, spec: FieldSpec, value: &Cell) {
        let range = spec.byte_range();
        let width = range.len();
        if spec.includes_sign() {
            self.sign = value.sign;
        }
        self.bytes[range].copy_from_slice(&value.bytes[CELL_BYTES - width..]);
    }

    /// Signed address field: bytes 0..2 with the cell's sign.
    pub fn address(&self) -> i32 {
        address::decode_signed(self.sign, &self.bytes[ADDRESS])
    }

    /// Set the address field and the sign from a signed value.
    pub fn set_address(&mut self, value: i32) -> Result<(), WordError> {
        let (sign, bytes) = address::encode_signed(value)?;
        self.sign = sign;
        self.bytes[ADDRESS].copy_from_slice(&bytes);
        Ok(())
    }

    /// Set the address field from a sign and magnitude separately, which
    /// keeps a negative zero.
    pub fn set_signed_magnitude(&mut self, sign: Sign, magnitude: u32) -> Result<(), WordError> {
        if magnitude > address::MAX_MAGNITUDE {
            return Err(WordError::AddressOverflow(magnitude as i32));
        }
        self.sign = sign;
        self.bytes[ADDRESS.start] = (magnitude / BYTE_RADIX) as u8;
        self.bytes[ADDRESS.start + 1] = (magnitude % BYTE_RADIX) as u8;
        Ok(())
    }

    #[inline]
    pub const fn index(&self) -> u8 {
        self.bytes[INDEX]
    }

    pub fn set_index(&mut self, index: u8) {
        check_bytes(&[index]);
        self.bytes[INDEX] = index;
    }

    /// The raw packed field byte.
    #[inline]
    pub const fn field_byte(&self) -> u8 {
        self.bytes[FIELD]
    }

    pub fn set_field_byte(&mut self, m: u8) {
        check_bytes(&[m]);
        self.bytes[FIELD] = m;
    }

    #[inline]
    pub const fn opcode_byte(&self) -> u8 {
        self.bytes[OPCODE]
    }

    pub fn set_opcode_byte(&mut self, op: u8) {
        check_bytes(&[op]);
        self.bytes[OPCODE] = op;
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign)?;
        for b in &self.bytes {
            write!(f, " {:02}", b)?;
        }
        Ok(())
    }
}

impl FromStr for Cell {
    type Err = WordError;

    /// Parse the plain form, e.g. `"- 00 00 00 00 00"` or `"+ 1 2 3 4 5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sign, bytes) = parse_signed_bytes::<CELL_BYTES>(s)?;
        Ok(Self { sign, bytes })
    }
}

impl std::ops::Neg for Cell {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

// ============================================================================
// IndexCell Implementation
// ============================================================================

impl IndexCell {
    /// Positive zero.
    pub const ZERO: IndexCell = IndexCell { sign: Sign::Positive, bytes: [0; INDEX_BYTES] };

    /// # Panics
    /// Panics if any byte is outside `0..=63`.
    pub fn new(sign: Sign, bytes: [u8; INDEX_BYTES]) -> Self {
        check_bytes(&bytes);
        Self { sign, bytes }
    }

    /// Create from a signed value in `-4095..=4095`.
    pub fn from_value(value: i32) -> Result<Self, WordError> {
        let (sign, bytes) = address::encode_signed(value)?;
        Ok(Self { sign, bytes })
    }

    #[inline]
    pub const fn sign(&self) -> Sign {
        self.sign
    }

    #[inline]
    pub const fn bytes(&self) -> &[u8; INDEX_BYTES] {
        &self.bytes
    }

    /// Signed displacement this register contributes to an address.
    pub fn value(&self) -> i32 {
        address::decode_signed(self.sign, &self.bytes)
    }

    /// Narrow a full cell: keep the sign and bytes 3 and 4.
    pub fn from_cell(cell: &Cell) -> Self {
        let mut bytes = [0u8; INDEX_BYTES];
        bytes.copy_from_slice(&cell.bytes[INDEX_SLOT]);
        Self { sign: cell.sign, bytes }
    }

    /// Widen to a full cell with the bytes at positions 3 and 4.
    pub fn to_cell(&self) -> Cell {
        let mut cell = Cell { sign: self.sign, bytes: [0; CELL_BYTES] };
        cell.bytes[INDEX_SLOT].copy_from_slice(&self.bytes);
        cell
    }
}

impl fmt::Display for IndexCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02} {:02}", self.sign, self.bytes[0], self.bytes[1])
    }
}

impl FromStr for IndexCell {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sign, bytes) = parse_signed_bytes::<INDEX_BYTES>(s)?;
        Ok(Self { sign, bytes })
    }
}

impl From<IndexCell> for Cell {
    fn from(index: IndexCell) -> Self {
        index.to_cell()
    }
}

impl From<&Cell> for IndexCell {
    fn from(cell: &Cell) -> Self {
        IndexCell::from_cell(cell)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cell(sign: Sign, bytes: [u8; 5]) -> Cell {
        Cell::new(sign, bytes)
    }

    #[test]
    fn test_plain_display() {
        assert_eq!(Cell::new(Sign::Negative, [0; 5]).to_string(), "- 00 00 00 00 00");
        assert_eq!(Cell::ZERO.to_string(), "+ 00 00 00 00 00");
        assert_eq!(
            cell(Sign::Positive, [18, 48, 0, 19, 24]).to_string(),
            "+ 18 48 00 19 24"
        );
    }

    #[test]
    fn test_plain_parse() {
        assert_eq!(
            "- 00 00 00 00 00".parse::<Cell>().unwrap(),
            cell(Sign::Negative, [0; 5])
        );
        assert_eq!(
            "+ 1 2 3 4 5".parse::<Cell>().unwrap(),
            cell(Sign::Positive, [1, 2, 3, 4, 5])
        );
    }

    #[test]
    fn test_plain_parse_errors() {
        assert!(matches!("* 1 2 3 4 5".parse::<Cell>(), Err(WordError::MalformedSign(_))));
        assert!(matches!("".parse::<Cell>(), Err(WordError::MalformedSign(_))));
        assert_eq!(
            "+ 1 2 3 4".parse::<Cell>(),
            Err(WordError::WrongLength { expected: 5, got: 4 })
        );
        assert_eq!("+ 1 2 3 4 64".parse::<Cell>(), Err(WordError::ByteOutOfRange(64)));
        assert!(matches!("+ 1 2 x 4 5".parse::<Cell>(), Err(WordError::InvalidNumber(_))));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_new_rejects_wide_bytes() {
        Cell::new(Sign::Positive, [0, 0, 0, 0, 64]);
    }

    #[test]
    fn test_get_field_right_aligns() {
        let source = cell(Sign::Negative, [10, 11, 0, 11, 22]);
        let spec = FieldSpec::from_byte(11).unwrap();
        assert_eq!(source.get_field(spec), cell(Sign::Positive, [0, 0, 10, 11, 0]));
    }

    #[test]
    fn test_get_field_copies_sign_when_left_is_zero() {
        let source = cell(Sign::Negative, [1, 2, 3, 4, 5]);
        assert_eq!(
            source.get_field(FieldSpec::new(0, 2).unwrap()),
            cell(Sign::Negative, [0, 0, 0, 1, 2])
        );
        assert_eq!(source.get_field(FieldSpec::SIGN), cell(Sign::Negative, [0; 5]));
        assert_eq!(source.get_field(FieldSpec::WHOLE), source);
    }

    #[test]
    fn test_get_single_byte() {
        let source = cell(Sign::Negative, [1, 2, 3, 4, 5]);
        assert_eq!(
            source.get_field(FieldSpec::new(3, 3).unwrap()),
            cell(Sign::Positive, [0, 0, 0, 0, 3])
        );
    }

    #[test]
    fn test_get_field_reads_field_bytes_not_trailing_bytes() {
        let source = cell(Sign::Positive, [1, 2, 3, 4, 5]);
        assert_eq!(
            source.get_field(FieldSpec::new(1, 2).unwrap()),
            cell(Sign::Positive, [0, 0, 0, 1, 2])
        );
        assert_eq!(
            source.get_field(FieldSpec::new(2, 4).unwrap()),
            cell(Sign::Positive, [0, 0, 2, 3, 4])
        );
    }

    #[test]
    fn test_set_field_partial() {
        let mut target = cell(Sign::Negative, [20, 21, 22, 23, 24]);
        let value = cell(Sign::Positive, [1, 2, 3, 4, 5]);
        target.set_field(FieldSpec::new(2, 3).unwrap(), &value);
        assert_eq!(target, cell(Sign::Negative, [20, 4, 5, 23, 24]));
    }

    #[test]
    fn test_set_field_sign_only() {
        let mut target = cell(Sign::Positive, [20, 21, 22, 23, 24]);
        target.set_field(FieldSpec::SIGN, &cell(Sign::Negative, [1, 2, 3, 4, 5]));
        assert_eq!(target, cell(Sign::Negative, [20, 21, 22, 23, 24]));
    }

    #[test]
    fn test_instruction_fields() {
        let instr = cell(Sign::Negative, [0, 32, 2, 11, 8]);
        assert_eq!(instr.address(), -32);
        assert_eq!(instr.index(), 2);
        assert_eq!(instr.field_byte(), 11);
        assert_eq!(instr.opcode_byte(), 8);

        assert_eq!(cell(Sign::Negative, [0, 0, 1, 2, 3]).address(), 0);
        assert_eq!(cell(Sign::Negative, [0, 1, 1, 2, 3]).address(), -1);
        assert_eq!(cell(Sign::Positive, [1, 0, 1, 2, 3]).address(), 64);
        assert_eq!(cell(Sign::Negative, [0, 5, 1, 2, 3]).address(), -5);
    }

    #[test]
    fn test_set_instruction_fields() {
        let mut instr = cell(Sign::Positive, [1, 2, 3, 4, 5]);
        instr.set_opcode_byte(8);
        assert_eq!(instr.bytes()[4], 8);

        instr.set_address(-1200).unwrap();
        instr.set_index(0);
        instr.set_field_byte(19);
        assert_eq!(instr, cell(Sign::Negative, [18, 48, 0, 19, 8]));

        assert_eq!(instr.set_address(5000), Err(WordError::AddressOverflow(5000)));
    }

    #[test]
    fn test_set_signed_magnitude_keeps_negative_zero() {
        let mut instr = Cell::ZERO;
        instr.set_signed_magnitude(Sign::Negative, 0).unwrap();
        assert_eq!(instr.sign(), Sign::Negative);
        assert_eq!(instr.address(), 0);
    }

    #[test]
    fn test_index_cell_conversions() {
        let full = cell(Sign::Negative, [1, 2, 3, 4, 5]);
        let index = IndexCell::from_cell(&full);
        assert_eq!(index, IndexCell::new(Sign::Negative, [4, 5]));
        assert_eq!(index.to_cell(), cell(Sign::Negative, [0, 0, 0, 4, 5]));
        assert_eq!(index.value(), -(4 * 64 + 5));
    }

    #[test]
    fn test_index_cell_text() {
        let index = IndexCell::new(Sign::Positive, [0, 63]);
        assert_eq!(index.to_string(), "+ 00 63");
        assert_eq!("+ 0 63".parse::<IndexCell>().unwrap(), index);
        assert_eq!(IndexCell::from_value(63).unwrap(), index);
    }

    #[test]
    fn test_negation() {
        let c = cell(Sign::Positive, [0; 5]);
        assert_eq!((-c).sign(), Sign::Negative);
        assert!((-c).is_zero());
    }

    fn any_cell() -> impl Strategy<Value = Cell> {
        (any::<bool>(), prop::array::uniform5(0u8..64)).prop_map(|(neg, bytes)| {
            Cell::new(if neg { Sign::Negative } else { Sign::Positive }, bytes)
        })
    }

    proptest! {
        /// A field write leaves every byte outside the field, and the sign
        /// when excluded, exactly as it was.
        #[test]
        fn prop_set_field_preserves_outside(
            target in any_cell(),
            value in any_cell(),
            left in 0u8..=5,
            extra in 0u8..=5,
        ) {
            let right = (left + extra).min(5);
            let spec = FieldSpec::new(left, right).unwrap();
            let mut written = target;
            written.set_field(spec, &value);

            let range = spec.byte_range();
            for i in 0..5 {
                if !range.contains(&i) {
                    prop_assert_eq!(written.bytes()[i], target.bytes()[i]);
                }
            }
            if !spec.includes_sign() {
                prop_assert_eq!(written.sign(), target.sign());
            }
        }

        /// Reading a field picks the same bytes a write to that field
        /// replaced, so a write followed by a read returns the value's
        /// right-aligned field.
        #[test]
        fn prop_get_after_set_returns_written_field(
            target in any_cell(),
            value in any_cell(),
            left in 0u8..=5,
            extra in 0u8..=5,
        ) {
            let right = (left + extra).min(5);
            let spec = FieldSpec::new(left, right).unwrap();
            let mut written = target;
            written.set_field(spec, &value);

            let width = spec.width();
            let mut expected = [0u8; 5];
            expected[5 - width..].copy_from_slice(&value.bytes()[5 - width..]);
            let sign = if spec.includes_sign() { value.sign() } else { Sign::Positive };
            prop_assert_eq!(written.get_field(spec), Cell::new(sign, expected));

            // Reading from the untouched target picks exactly the field's bytes.
            let read = target.get_field(spec);
            let range = spec.byte_range();
            prop_assert_eq!(&read.bytes()[5 - width..], &target.bytes()[range]);
            prop_assert!(read.bytes()[..5 - width].iter().all(|&b| b == 0));
        }

        #[test]
        fn prop_plain_text_round_trip(c in any_cell()) {
            prop_assert_eq!(c.to_string().parse::<Cell>().unwrap(), c);
        }
    }
}
