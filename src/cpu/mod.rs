//! CPU emulation for the MIX computer.
//!
//! This module implements the load/store core of the MIX architecture:
//! - 4000 five-byte memory cells
//! - registers A, X, I1..I6, the overflow toggle and comparison indicator
//! - effective-address resolution with index registers
//! - dispatch of the load, load-negative and store opcode families

pub mod memory;
pub mod registers;
pub mod decode;
pub mod execute;

pub use memory::{Memory, MemoryError, MEMORY_SIZE};
pub use registers::{Comparison, Registers};
pub use decode::{decode, encode, IndexReg, Instruction, Opcode, Register, DecodeError};
pub use execute::{Machine, MachineError};
