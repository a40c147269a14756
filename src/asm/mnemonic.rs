//! Mnemonic text form of single instructions.
//!
//! Syntax:
//! ```text
//! LDA 2000            ; load A from cell 2000, whole word
//! LD2 -32,2(1:3)      ; address -32 indexed by I2, bytes 1..3
//! STA 1200(2:3)       ; store the low two bytes of A into bytes 2..3
//! ```
//!
//! `,INDEX` defaults to 0 and `(L:R)` to the opcode's default field
//! `(0:5)`; both are omitted again when rendering.

use crate::cpu::decode::{Opcode, INDEX_REGISTERS};
use crate::word::{Cell, FieldSpec, Sign, WordError};
use thiserror::Error;

/// Mnemonic → opcode byte for every instruction with a text form.
const MNEMONICS: [(&str, u8); 24] = [
    ("LDA", 8), ("LD1", 9), ("LD2", 10), ("LD3", 11),
    ("LD4", 12), ("LD5", 13), ("LD6", 14), ("LDX", 15),
    ("LDAN", 16), ("LD1N", 17), ("LD2N", 18), ("LD3N", 19),
    ("LD4N", 20), ("LD5N", 21), ("LD6N", 22), ("LDXN", 23),
    ("STA", 24), ("ST1", 25), ("ST2", 26), ("ST3", 27),
    ("ST4", 28), ("ST5", 29), ("ST6", 30), ("STX", 31),
];

/// Look up the opcode byte for a mnemonic (case-insensitive).
pub fn opcode_for(mnemonic: &str) -> Option<u8> {
    MNEMONICS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(mnemonic))
        .map(|&(_, op)| op)
}

/// Look up the mnemonic for an opcode byte.
pub fn mnemonic_for(op: u8) -> Option<&'static str> {
    MNEMONICS
        .iter()
        .find(|&&(_, code)| code == op)
        .map(|&(name, _)| name)
}

/// Parse `OP ADDRESS[,INDEX][(L:R)]` into an instruction cell.
pub fn parse_instruction(text: &str) -> Result<Cell, AsmError> {
    let text = text.trim();
    let (mnemonic, operand) = text
        .split_once(char::is_whitespace)
        .ok_or_else(|| AsmError::Syntax(format!("missing address in {:?}", text)))?;

    let op = opcode_for(mnemonic)
        .ok_or_else(|| AsmError::UnknownMnemonic(mnemonic.to_string()))?;
    let opcode = Opcode::from_byte(op)
        .map_err(|e| AsmError::Syntax(e.to_string()))?;

    let (operand, field) = split_field(operand.trim(), opcode)?;
    let (address, index) = match operand.split_once(',') {
        Some((address, index)) => (address, parse_index(index)?),
        None => (operand, 0),
    };
    let (sign, magnitude) = parse_address(address.trim())?;

    let mut cell = Cell::ZERO;
    cell.set_signed_magnitude(sign, magnitude)?;
    cell.set_index(index);
    cell.set_field_byte(field.to_byte());
    cell.set_opcode_byte(op);
    Ok(cell)
}

/// Render an instruction cell as mnemonic text.
///
/// Cells that have no text form render as `??? ; <plain cell>`.
pub fn render_instruction(cell: &Cell) -> String {
    let unknown = || format!("??? ; {}", cell);

    let Some(mnemonic) = mnemonic_for(cell.opcode_byte()) else {
        return unknown();
    };
    let Ok(opcode) = Opcode::from_byte(cell.opcode_byte()) else {
        return unknown();
    };
    let Ok(field) = FieldSpec::from_byte(cell.field_byte()) else {
        return unknown();
    };
    if cell.index() as usize > INDEX_REGISTERS {
        return unknown();
    }

    let mut out = String::from(mnemonic);
    out.push(' ');
    if cell.sign().is_negative() {
        out.push('-');
    }
    out.push_str(&cell.address().unsigned_abs().to_string());
    if cell.index() != 0 {
        out.push_str(&format!(",{}", cell.index()));
    }
    if field != opcode.default_field() {
        out.push_str(&field.to_string());
    }
    out
}

/// Split a trailing `(L:R)` off the operand.
fn split_field(operand: &str, opcode: Opcode) -> Result<(&str, FieldSpec), AsmError> {
    let Some(open) = operand.find('(') else {
        return Ok((operand, opcode.default_field()));
    };

    let inner = operand[open + 1..]
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| AsmError::Syntax(format!("unterminated field spec in {:?}", operand)))?;
    let (left, right) = inner
        .split_once(':')
        .ok_or_else(|| AsmError::Syntax(format!("field spec {:?} needs L:R", inner)))?;

    let field = FieldSpec::new(parse_small(left)?, parse_small(right)?)?;
    Ok((&operand[..open], field))
}

fn parse_small(text: &str) -> Result<u8, AsmError> {
    let text = text.trim();
    text.parse()
        .map_err(|_| AsmError::Word(WordError::InvalidNumber(text.to_string())))
}

fn parse_index(text: &str) -> Result<u8, AsmError> {
    let text = text.trim();
    let index: u32 = text
        .parse()
        .map_err(|_| AsmError::Word(WordError::InvalidNumber(text.to_string())))?;
    if index as usize > INDEX_REGISTERS {
        return Err(AsmError::IndexOutOfRange(index));
    }
    Ok(index as u8)
}

/// Parse `[+|-]digits`, keeping the sign separate so `-0` survives.
fn parse_address(text: &str) -> Result<(Sign, u32), AsmError> {
    let (sign, digits) = match text.chars().next() {
        Some(c @ ('+' | '-')) => (Sign::from_char(c)?, &text[1..]),
        _ => (Sign::Positive, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AsmError::Syntax(format!("invalid address {:?}", text)));
    }
    let magnitude = digits
        .parse()
        .map_err(|_| AsmError::Word(WordError::InvalidNumber(text.to_string())))?;
    Ok((sign, magnitude))
}

/// Errors that can occur while parsing instruction text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    #[error("unknown mnemonic: {0}")]
    UnknownMnemonic(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("index register {0} out of range (0-6)")]
    IndexOutOfRange(u32),

    #[error(transparent)]
    Word(#[from] WordError),
}
