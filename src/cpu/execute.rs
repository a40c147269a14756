//! MIX execution engine.
//!
//! [`Machine::execute`] is the single dispatch entry point: it decodes one
//! instruction cell, resolves its effective address and performs the field
//! load or store. Nothing else touches memory.

use crate::cpu::{Memory, Registers};
use crate::cpu::decode::{self, IndexReg, Instruction, Opcode, DecodeError};
use crate::cpu::memory::MemoryError;
use crate::cpu::registers::Comparison;
use crate::word::{Cell, IndexCell, WordError};
use log::{trace, warn};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// A MIX machine: registers plus 4000 cells of memory.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Machine {
    regs: Registers,
    mem: Memory,
    /// Instructions executed successfully.
    executed: u64,
}

impl Machine {
    /// Create a machine with every register and cell `+0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset registers, memory and the instruction count.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.executed = 0;
    }

    /// Execute one instruction cell.
    ///
    /// Returns the decoded instruction. On error no register or memory cell
    /// has changed.
    pub fn execute(&mut self, cell: &Cell) -> Result<Instruction, MachineError> {
        let instr = decode::decode(cell)?;

        match instr.opcode {
            Opcode::Load(reg) => {
                let value = self.fetch(&instr)?;
                self.regs.write(reg, value);
            }

            Opcode::LoadNegative(reg) => {
                let value = self.fetch(&instr)?;
                self.regs.write(reg, value.negated());
            }

            Opcode::Store(reg) => {
                let spec = instr.field_spec()?;
                let addr = self.effective_address(&instr)?;
                let value = self.regs.read(reg);
                self.mem.cell_mut(addr)?.set_field(spec, &value);
            }

            op @ (Opcode::Nop
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Special
            | Opcode::Shift
            | Opcode::Move
            | Opcode::StoreJump
            | Opcode::StoreZero
            | Opcode::JumpBusy
            | Opcode::IoControl
            | Opcode::Input
            | Opcode::Output
            | Opcode::JumpReady
            | Opcode::Jump
            | Opcode::RegisterJump(_)
            | Opcode::AddressTransfer(_)
            | Opcode::Compare(_)) => {
                warn!("rejected unimplemented opcode {} in {}", op, cell);
                return Err(MachineError::UnimplementedOpcode(op));
            }
        }

        self.executed += 1;
        Ok(instr)
    }

    /// Resolve an instruction's effective address to a memory index.
    pub fn effective_address(&self, instr: &Instruction) -> Result<usize, MachineError> {
        let sum = self.regs.effective_address(instr);
        let addr = Memory::checked_index(sum)?;
        trace!("{} {} -> M[{}]", instr.opcode, instr.address, addr);
        Ok(addr)
    }

    /// Read the instruction's field from memory, right-aligned.
    fn fetch(&self, instr: &Instruction) -> Result<Cell, MachineError> {
        let spec = instr.field_spec()?;
        let addr = self.effective_address(instr)?;
        Ok(self.mem.read(addr)?.get_field(spec))
    }

    // ==================== Accessors ====================

    pub fn accumulator(&self) -> Cell {
        self.regs.a
    }

    pub fn set_accumulator(&mut self, value: Cell) {
        self.regs.a = value;
    }

    pub fn extension(&self) -> Cell {
        self.regs.x
    }

    pub fn set_extension(&mut self, value: Cell) {
        self.regs.x = value;
    }

    /// Index register `n` (1..=6).
    pub fn index_register(&self, n: u8) -> Result<IndexCell, MachineError> {
        let slot = Self::index_slot(n)?;
        Ok(self.regs.i[slot])
    }

    /// Set index register `n` (1..=6).
    pub fn set_index_register(&mut self, n: u8, value: IndexCell) -> Result<(), MachineError> {
        let slot = Self::index_slot(n)?;
        self.regs.i[slot] = value;
        Ok(())
    }

    fn index_slot(n: u8) -> Result<usize, MachineError> {
        IndexReg::new(n)
            .map(IndexReg::slot)
            .ok_or(MachineError::Decode(DecodeError::InvalidIndexRegister(n)))
    }

    pub fn overflow(&self) -> bool {
        self.regs.overflow
    }

    pub fn set_overflow(&mut self, overflow: bool) {
        self.regs.overflow = overflow;
    }

    pub fn comparison(&self) -> Comparison {
        self.regs.comparison
    }

    pub fn set_comparison(&mut self, comparison: Comparison) {
        self.regs.comparison = comparison;
    }

    /// Read-only view of the whole register file.
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Read memory cell `addr`.
    pub fn memory(&self, addr: usize) -> Result<Cell, MachineError> {
        Ok(self.mem.read(addr)?)
    }

    /// Write memory cell `addr`.
    pub fn set_memory(&mut self, addr: usize, value: Cell) -> Result<(), MachineError> {
        Ok(self.mem.write(addr, value)?)
    }

    /// Cells in `start..start + count`, clipped to the end of memory.
    pub fn dump(&self, start: usize, count: usize) -> Vec<(usize, Cell)> {
        self.mem.dump(start, count)
    }

    /// Number of instructions executed since creation or reset.
    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("executed", &self.executed)
            .field("regs", &self.regs)
            .field("mem", &self.mem)
            .finish()
    }
}

/// Errors that can occur while executing an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("field error: {0}")]
    Field(#[from] WordError),

    #[error("unimplemented opcode: {0}")]
    UnimplementedOpcode(Opcode),
}
