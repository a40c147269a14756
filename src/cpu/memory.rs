//! MIX memory.
//!
//! 4000 cells addressed `0..=3999`. Every effective address an instruction
//! produces goes through [`Memory::checked_index`]; out-of-range sums are an
//! error, never wrapped.

use crate::word::Cell;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The number of memory cells.
pub const MEMORY_SIZE: usize = 4000;

/// MIX memory: 4000 five-byte cells.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<Cell>,
}

impl Memory {
    /// Create a new memory with every cell `+0`.
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::ZERO; MEMORY_SIZE],
        }
    }

    /// Convert a signed effective address to a cell index.
    pub fn checked_index(addr: i32) -> Result<usize, MemoryError> {
        usize::try_from(addr)
            .ok()
            .filter(|&index| index < MEMORY_SIZE)
            .ok_or(MemoryError::AddressOutOfRange(addr))
    }

    /// Read the cell at `addr`.
    pub fn read(&self, addr: usize) -> Result<Cell, MemoryError> {
        self.cells
            .get(addr)
            .copied()
            .ok_or(MemoryError::AddressOutOfRange(addr as i32))
    }

    /// Write the cell at `addr`.
    pub fn write(&mut self, addr: usize, value: Cell) -> Result<(), MemoryError> {
        let cell = self
            .cells
            .get_mut(addr)
            .ok_or(MemoryError::AddressOutOfRange(addr as i32))?;
        *cell = value;
        Ok(())
    }

    /// Mutable access to one cell, for field writes.
    pub(crate) fn cell_mut(&mut self, addr: usize) -> Result<&mut Cell, MemoryError> {
        self.cells
            .get_mut(addr)
            .ok_or(MemoryError::AddressOutOfRange(addr as i32))
    }

    /// Reset every cell to `+0`.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::ZERO);
    }

    /// Cells in `start..start + count`, clipped to the end of memory.
    pub fn dump(&self, start: usize, count: usize) -> Vec<(usize, Cell)> {
        let end = start.saturating_add(count).min(MEMORY_SIZE);
        (start.min(end)..end)
            .map(|i| (i, self.cells[i]))
            .collect()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count cells that differ from +0
        let touched = self.cells
            .iter()
            .filter(|cell| **cell != Cell::ZERO)
            .count();

        f.debug_struct("Memory")
            .field("touched_cells", &touched)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("memory address {0} out of range (0 to 3999)")]
    AddressOutOfRange(i32),
}
