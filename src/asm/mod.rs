//! Text front ends for MIX instructions.
//!
//! This module provides:
//! - The mnemonic codec (`OP ADDRESS,INDEX(L:R)` ↔ instruction cell)
//! - Decks: line-oriented batch files that set up and drive a machine

pub mod mnemonic;
pub mod deck;

pub use mnemonic::{parse_instruction, render_instruction, AsmError};
pub use deck::{Deck, DeckError, Step};
