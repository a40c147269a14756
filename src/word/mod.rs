//! MIX data primitives.
//!
//! This module provides the core types every other layer is built from:
//! - [`Sign`] - the explicit sign carried by every cell
//! - [`Cell`] - a five-byte word (memory, `A`, `X`, instructions)
//! - [`IndexCell`] - a two-byte word (index registers `I1`..`I6`)
//! - [`FieldSpec`] - an `(L:R)` selector for partial reads and writes
//! - [`address`] - base-64 address decoding and encoding
//!
//! A MIX "byte" is a digit in `0..=63`, not an 8-bit machine byte.

mod sign;
mod cell;
mod field;
pub mod address;

pub use sign::Sign;
pub use cell::{Cell, IndexCell};
pub use field::{FieldSpec, pack, unpack};

use thiserror::Error;

/// Number of values one MIX byte can hold.
pub const BYTE_RADIX: u32 = 64;

/// Magnitude bytes in a full cell.
pub const CELL_BYTES: usize = 5;

/// Magnitude bytes in an index cell.
pub const INDEX_BYTES: usize = 2;

/// Errors raised while building or parsing words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("malformed sign {0:?} (expected '+' or '-')")]
    MalformedSign(String),

    #[error("invalid field spec ({left}:{right})")]
    InvalidFieldSpec { left: u8, right: u8 },

    #[error("byte value {0} out of range (0-63)")]
    ByteOutOfRange(u32),

    #[error("address {0} out of range (-4095 to +4095)")]
    AddressOverflow(i32),

    #[error("expected {expected} bytes, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
}
