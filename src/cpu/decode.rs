//! Instruction decoder for MIX.
//!
//! An instruction is an ordinary [`Cell`] read through the layout
//! `± AA I F C`: signed two-byte address, index selector, field byte,
//! opcode byte.

use crate::word::{Cell, FieldSpec, WordError, BYTE_RADIX};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Number of index registers.
pub const INDEX_REGISTERS: usize = 6;

/// Index register selector `1..=6`.
///
/// Only built through [`IndexReg::new`] (or [`Register::index`]), so every
/// value names a real index register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct IndexReg(u8);

impl IndexReg {
    pub const I1: IndexReg = IndexReg(1);
    pub const I2: IndexReg = IndexReg(2);
    pub const I3: IndexReg = IndexReg(3);
    pub const I4: IndexReg = IndexReg(4);
    pub const I5: IndexReg = IndexReg(5);
    pub const I6: IndexReg = IndexReg(6);

    pub fn new(n: u8) -> Option<Self> {
        (1..=INDEX_REGISTERS as u8).contains(&n).then_some(IndexReg(n))
    }

    /// One-based register number.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot in the register file.
    #[inline]
    pub const fn slot(self) -> usize {
        self.0 as usize - 1
    }
}

impl TryFrom<u8> for IndexReg {
    type Error = DecodeError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        IndexReg::new(n).ok_or(DecodeError::InvalidIndexRegister(n))
    }
}

impl From<IndexReg> for u8 {
    fn from(reg: IndexReg) -> Self {
        reg.0
    }
}

impl std::fmt::Display for IndexReg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A register named by an opcode.
///
/// Opcode families lay registers out in the order `A, I1..I6, X`, so the
/// low three bits of `opcode - family_base` select one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    /// Accumulator
    A,
    /// Index register `I1`..`I6`
    I(IndexReg),
    /// Extension
    X,
}

impl Register {
    pub const I1: Register = Register::I(IndexReg::I1);
    pub const I2: Register = Register::I(IndexReg::I2);
    pub const I3: Register = Register::I(IndexReg::I3);
    pub const I4: Register = Register::I(IndexReg::I4);
    pub const I5: Register = Register::I(IndexReg::I5);
    pub const I6: Register = Register::I(IndexReg::I6);

    /// All registers in opcode order.
    pub const ALL: [Register; 8] = [
        Register::A,
        Register::I1,
        Register::I2,
        Register::I3,
        Register::I4,
        Register::I5,
        Register::I6,
        Register::X,
    ];

    /// Register at `offset` (0..=7) within an opcode family.
    pub fn from_offset(offset: u8) -> Option<Self> {
        Self::ALL.get(offset as usize).copied()
    }

    /// Offset of this register within an opcode family.
    pub fn offset(self) -> u8 {
        match self {
            Register::A => 0,
            Register::I(n) => n.get(),
            Register::X => 7,
        }
    }

    /// Index register for selector `n` (1..=6).
    pub fn index(n: u8) -> Option<Self> {
        IndexReg::new(n).map(Register::I)
    }

    /// Name as used in mnemonics: `A`, `1`..`6`, `X`.
    pub fn suffix(self) -> String {
        match self {
            Register::A => "A".to_string(),
            Register::I(n) => n.to_string(),
            Register::X => "X".to_string(),
        }
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Register::A => write!(f, "A"),
            Register::I(n) => write!(f, "I{}", n),
            Register::X => write!(f, "X"),
        }
    }
}

/// Every MIX opcode, grouped by family.
///
/// Only the load, load-negative and store families execute. The rest decode
/// so they can be named in errors and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // ==================== Implemented ====================

    /// `LDA`, `LD1`..`LD6`, `LDX` (8..=15): `reg := M[F]`
    Load(Register),

    /// `LDAN`, `LD1N`..`LD6N`, `LDXN` (16..=23): `reg := -M[F]`
    LoadNegative(Register),

    /// `STA`, `ST1`..`ST6`, `STX` (24..=31): `M[F] := reg`
    Store(Register),

    // ==================== Not executed ====================

    Nop,
    Add,
    Sub,
    Mul,
    Div,
    /// `NUM`, `CHAR`, `HLT` (5)
    Special,
    /// `SLA`..`SRC` (6)
    Shift,
    Move,
    StoreJump,
    StoreZero,
    JumpBusy,
    IoControl,
    Input,
    Output,
    JumpReady,
    /// `JMP`..`JGE` (39)
    Jump,
    /// `JA*`, `J1*`..`J6*`, `JX*` (40..=47)
    RegisterJump(Register),
    /// `ENT*`, `ENN*`, `INC*`, `DEC*` (48..=55)
    AddressTransfer(Register),
    /// `CMPA`, `CMP1`..`CMP6`, `CMPX` (56..=63)
    Compare(Register),
}

/// First opcode byte of each register-indexed family.
const LOAD: u8 = 8;
const LOAD_NEGATIVE: u8 = 16;
const STORE: u8 = 24;
const REGISTER_JUMP: u8 = 40;
const ADDRESS_TRANSFER: u8 = 48;
const COMPARE: u8 = 56;

impl Opcode {
    /// Decode an opcode byte.
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        let family = |base: u8| Register::from_offset(byte - base).ok_or(DecodeError::InvalidOpcode(byte));
        let op = match byte {
            0 => Opcode::Nop,
            1 => Opcode::Add,
            2 => Opcode::Sub,
            3 => Opcode::Mul,
            4 => Opcode::Div,
            5 => Opcode::Special,
            6 => Opcode::Shift,
            7 => Opcode::Move,
            8..=15 => Opcode::Load(family(LOAD)?),
            16..=23 => Opcode::LoadNegative(family(LOAD_NEGATIVE)?),
            24..=31 => Opcode::Store(family(STORE)?),
            32 => Opcode::StoreJump,
            33 => Opcode::StoreZero,
            34 => Opcode::JumpBusy,
            35 => Opcode::IoControl,
            36 => Opcode::Input,
            37 => Opcode::Output,
            38 => Opcode::JumpReady,
            39 => Opcode::Jump,
            40..=47 => Opcode::RegisterJump(family(REGISTER_JUMP)?),
            48..=55 => Opcode::AddressTransfer(family(ADDRESS_TRANSFER)?),
            56..=63 => Opcode::Compare(family(COMPARE)?),
            _ => return Err(DecodeError::InvalidOpcode(byte)),
        };
        Ok(op)
    }

    /// Encode back to the opcode byte.
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::Nop => 0,
            Opcode::Add => 1,
            Opcode::Sub => 2,
            Opcode::Mul => 3,
            Opcode::Div => 4,
            Opcode::Special => 5,
            Opcode::Shift => 6,
            Opcode::Move => 7,
            Opcode::Load(r) => LOAD + r.offset(),
            Opcode::LoadNegative(r) => LOAD_NEGATIVE + r.offset(),
            Opcode::Store(r) => STORE + r.offset(),
            Opcode::StoreJump => 32,
            Opcode::StoreZero => 33,
            Opcode::JumpBusy => 34,
            Opcode::IoControl => 35,
            Opcode::Input => 36,
            Opcode::Output => 37,
            Opcode::JumpReady => 38,
            Opcode::Jump => 39,
            Opcode::RegisterJump(r) => REGISTER_JUMP + r.offset(),
            Opcode::AddressTransfer(r) => ADDRESS_TRANSFER + r.offset(),
            Opcode::Compare(r) => COMPARE + r.offset(),
        }
    }

    /// Field spec assumed when an instruction's text omits `(L:R)`.
    pub fn default_field(self) -> FieldSpec {
        FieldSpec::WHOLE
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opcode::Load(r) => write!(f, "LD{}", r.suffix()),
            Opcode::LoadNegative(r) => write!(f, "LD{}N", r.suffix()),
            Opcode::Store(r) => write!(f, "ST{}", r.suffix()),
            other => write!(f, "{:?} ({})", other, other.to_byte()),
        }
    }
}

/// A decoded instruction.
///
/// The field byte stays raw: its meaning depends on the opcode, so it is
/// only validated as a [`FieldSpec`] by the families that use one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Signed base address.
    pub address: i32,
    /// Index register applied to the address, if any.
    pub index: Option<IndexReg>,
    pub field: u8,
}

impl Instruction {
    /// The field byte as a validated field spec.
    pub fn field_spec(&self) -> Result<FieldSpec, WordError> {
        FieldSpec::from_byte(self.field)
    }
}

/// Decode an instruction cell.
pub fn decode(cell: &Cell) -> Result<Instruction, DecodeError> {
    let opcode = Opcode::from_byte(cell.opcode_byte())?;
    let index = match cell.index() {
        0 => None,
        n => Some(IndexReg::try_from(n)?),
    };

    Ok(Instruction {
        opcode,
        address: cell.address(),
        index,
        field: cell.field_byte(),
    })
}

/// Encode an instruction back to a cell.
///
/// `address` is a plain integer, so an instruction decoded from a `-0`
/// address encodes back with `+0`.
pub fn encode(instr: &Instruction) -> Result<Cell, WordError> {
    if u32::from(instr.field) >= BYTE_RADIX {
        return Err(WordError::ByteOutOfRange(u32::from(instr.field)));
    }
    let mut cell = Cell::ZERO;
    cell.set_address(instr.address)?;
    cell.set_index(instr.index.map_or(0, IndexReg::get));
    cell.set_field_byte(instr.field);
    cell.set_opcode_byte(instr.opcode.to_byte());
    Ok(cell)
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid opcode: {0}")]
    InvalidOpcode(u8),

    #[error("invalid index register selector: {0} (expected 0-6)")]
    InvalidIndexRegister(u8),
}
