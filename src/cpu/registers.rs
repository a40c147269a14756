//! MIX CPU registers.
//!
//! MIX has:
//! - A: five-byte accumulator
//! - X: five-byte extension register
//! - I1..I6: two-byte index registers for address modification
//! - an overflow toggle
//! - a three-way comparison indicator

use crate::cpu::decode::{IndexReg, Instruction, Register, INDEX_REGISTERS};
use crate::word::{Cell, IndexCell};
use serde::{Serialize, Deserialize};

/// Comparison indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Comparison {
    Less,
    #[default]
    Equal,
    Greater,
}

/// The MIX register file.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registers {
    /// A: accumulator
    pub a: Cell,

    /// X: extension
    pub x: Cell,

    /// I1..I6, stored zero-based
    pub i: [IndexCell; INDEX_REGISTERS],

    /// Overflow toggle
    pub overflow: bool,

    /// Comparison indicator
    pub comparison: Comparison,
}

impl Registers {
    /// Create a register file with every register `+0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all registers.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Read a register widened to a full cell.
    ///
    /// Index registers come back with their bytes at positions 4 and 5.
    pub fn read(&self, reg: Register) -> Cell {
        match reg {
            Register::A => self.a,
            Register::X => self.x,
            Register::I(n) => self.i[n.slot()].to_cell(),
        }
    }

    /// Write a full cell to a register.
    ///
    /// Index registers keep only the sign and the last two bytes.
    pub fn write(&mut self, reg: Register, value: Cell) {
        match reg {
            Register::A => self.a = value,
            Register::X => self.x = value,
            Register::I(n) => self.i[n.slot()] = IndexCell::from_cell(&value),
        }
    }

    /// Displacement contributed by an optional index register.
    pub fn index_delta(&self, index: Option<IndexReg>) -> i32 {
        index.map_or(0, |n| self.i[n.slot()].value())
    }

    /// Compute an instruction's effective address before range checking.
    ///
    /// - no index: address unchanged
    /// - `Ik`: address + value of `Ik`
    pub fn effective_address(&self, instr: &Instruction) -> i32 {
        instr.address + self.index_delta(instr.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::Opcode;
    use crate::word::Sign;

    fn lda(address: i32, index: Option<IndexReg>) -> Instruction {
        Instruction {
            opcode: Opcode::Load(Register::A),
            address,
            index,
            field: 5,
        }
    }

    #[test]
    fn test_effective_address() {
        let mut regs = Registers::new();
        regs.i[1] = IndexCell::new(Sign::Positive, [0, 63]);
        regs.i[0] = IndexCell::new(Sign::Negative, [0, 1]);

        // No index: unchanged
        assert_eq!(regs.effective_address(&lda(50, None)), 50);

        // I2 = +63
        assert_eq!(regs.effective_address(&lda(-32, Some(IndexReg::I2))), 31);

        // I1 = -1
        assert_eq!(regs.effective_address(&lda(13, Some(IndexReg::I1))), 12);
    }

    #[test]
    fn test_effective_address_may_leave_memory() {
        let mut regs = Registers::new();
        regs.i[5] = IndexCell::new(Sign::Negative, [1, 0]);
        assert_eq!(regs.effective_address(&lda(10, Some(IndexReg::I6))), -54);
    }

    #[test]
    fn test_read_write_index_register() {
        let mut regs = Registers::new();
        regs.write(Register::I3, Cell::new(Sign::Negative, [1, 2, 3, 4, 5]));

        assert_eq!(regs.i[2], IndexCell::new(Sign::Negative, [4, 5]));
        assert_eq!(
            regs.read(Register::I3),
            Cell::new(Sign::Negative, [0, 0, 0, 4, 5])
        );
    }

    #[test]
    fn test_every_index_register_is_addressable() {
        let mut regs = Registers::new();
        for n in 1..=6u8 {
            let reg = Register::index(n).unwrap();
            regs.write(reg, Cell::new(Sign::Positive, [0, 0, 0, 0, n]));
            assert_eq!(regs.i[n as usize - 1].value(), n as i32);
            assert_eq!(regs.read(reg).bytes()[4], n);
        }
        assert_eq!(Register::index(0), None);
        assert_eq!(Register::index(7), None);
    }

    #[test]
    fn test_read_write_full_registers() {
        let mut regs = Registers::new();
        let value = Cell::new(Sign::Negative, [1, 2, 3, 4, 5]);
        regs.write(Register::A, value);
        regs.write(Register::X, -value);

        assert_eq!(regs.read(Register::A), value);
        assert_eq!(regs.read(Register::X), -value);
    }

    #[test]
    fn test_reset() {
        let mut regs = Registers::new();
        regs.overflow = true;
        regs.comparison = Comparison::Greater;
        regs.a = Cell::new(Sign::Negative, [1, 1, 1, 1, 1]);
        regs.reset();

        assert_eq!(regs, Registers::new());
        assert_eq!(regs.comparison, Comparison::Equal);
    }
}
