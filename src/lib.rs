//! # MIX Emulator
//!
//! An emulator of the load/store core of Knuth's MIX computer.
//!
//! MIX words are five six-bit bytes plus an explicit sign. This crate models
//! the word format, partial-field access, indexed addressing and the load,
//! load-negative and store instruction families.

pub mod word;
pub mod cpu;
pub mod asm;

// Re-export commonly used types
pub use word::{Cell, FieldSpec, IndexCell, Sign, WordError};
pub use cpu::{Machine, MachineError, Memory, Registers, IndexReg, Instruction, Opcode, Register};
pub use asm::{parse_instruction, render_instruction, AsmError, Deck, DeckError};
