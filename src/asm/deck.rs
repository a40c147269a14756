//! Batch decks: set up a machine and run instructions in order.
//!
//! Syntax:
//! ```text
//! ; Comment
//! SET A + 01 02 03 04 05      ; A and X take a full cell
//! SET I2 + 00 63              ; I1..I6 take an index cell
//! MEM 1200 - 20 21 22 23 24   ; store a cell in memory
//! STA 1200(2:3)               ; execute a mnemonic instruction
//! EXEC + 18 48 00 19 24       ; execute a raw instruction cell
//! ```

use crate::asm::mnemonic::{parse_instruction, AsmError};
use crate::cpu::{Machine, MachineError, Register, MEMORY_SIZE};
use crate::word::{Cell, IndexCell, WordError};
use log::debug;
use thiserror::Error;

/// One deck statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Load a register before execution starts.
    SetRegister(Register, Cell),
    /// Store a cell directly into memory.
    SetMemory(usize, Cell),
    /// Execute an instruction cell.
    Execute(Cell),
}

/// A parsed deck: steps with their source line numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    steps: Vec<(usize, Step)>,
}

impl Deck {
    /// Parse deck source.
    pub fn parse(source: &str) -> Result<Self, DeckError> {
        let mut deck = Deck::default();
        for (line_num, line) in source.lines().enumerate() {
            if let Some(step) = parse_line(line, line_num + 1)? {
                deck.steps.push((line_num + 1, step));
            }
        }
        Ok(deck)
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().map(|(_, step)| step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step to `machine` in order.
    ///
    /// Returns the number of instructions executed. Stops at the first
    /// failing step.
    pub fn run(&self, machine: &mut Machine) -> Result<usize, DeckError> {
        let mut executed = 0;
        for (line, step) in &self.steps {
            let line = *line;
            debug!("line {}: {:?}", line, step);
            let result = match step {
                Step::SetRegister(Register::A, value) => {
                    machine.set_accumulator(*value);
                    Ok(())
                }
                Step::SetRegister(Register::X, value) => {
                    machine.set_extension(*value);
                    Ok(())
                }
                Step::SetRegister(Register::I(n), value) => {
                    machine.set_index_register(n.get(), IndexCell::from_cell(value))
                }
                Step::SetMemory(addr, value) => machine.set_memory(*addr, *value),
                Step::Execute(instr) => machine.execute(instr).map(|_| executed += 1),
            };
            result.map_err(|source| DeckError::Machine { line, source })?;
        }
        Ok(executed)
    }
}

fn parse_line(line: &str, line_num: usize) -> Result<Option<Step>, DeckError> {
    // Remove comments
    let line = match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    }
    .trim();

    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .map(|(k, r)| (k, r.trim()))
        .unwrap_or((line, ""));
    let word_err = |source: WordError| DeckError::Word { line: line_num, source };

    let step = match keyword.to_uppercase().as_str() {
        "SET" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| DeckError::syntax(line_num, "SET requires a register and a value"))?;
            let reg = parse_register(name)
                .ok_or_else(|| DeckError::syntax(line_num, format!("unknown register {:?}", name)))?;
            let value = match reg {
                Register::I(_) => value.parse::<IndexCell>().map(Cell::from),
                _ => value.parse::<Cell>(),
            }
            .map_err(word_err)?;
            Step::SetRegister(reg, value)
        }

        "MEM" => {
            let (addr, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| DeckError::syntax(line_num, "MEM requires an address and a cell"))?;
            let addr: usize = addr
                .parse()
                .ok()
                .filter(|&a| a < MEMORY_SIZE)
                .ok_or_else(|| DeckError::syntax(line_num, format!("invalid memory address {:?}", addr)))?;
            Step::SetMemory(addr, value.parse::<Cell>().map_err(word_err)?)
        }

        "EXEC" => Step::Execute(rest.parse::<Cell>().map_err(word_err)?),

        _ => {
            let instr = parse_instruction(line)
                .map_err(|source| DeckError::Asm { line: line_num, source })?;
            Step::Execute(instr)
        }
    };

    Ok(Some(step))
}

fn parse_register(name: &str) -> Option<Register> {
    match name.to_uppercase().as_str() {
        "A" => Some(Register::A),
        "X" => Some(Register::X),
        other => {
            let n = other.strip_prefix('I')?.parse().ok()?;
            Register::index(n)
        }
    }
}

/// Errors that can occur while parsing or running a deck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {source}")]
    Asm { line: usize, source: AsmError },

    #[error("line {line}: {source}")]
    Word { line: usize, source: WordError },

    #[error("line {line}: {source}")]
    Machine { line: usize, source: MachineError },
}

impl DeckError {
    fn syntax(line: usize, message: impl Into<String>) -> Self {
        DeckError::Syntax { line, message: message.into() }
    }

    /// Source line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            DeckError::Syntax { line, .. }
            | DeckError::Asm { line, .. }
            | DeckError::Word { line, .. }
            | DeckError::Machine { line, .. } => *line,
        }
    }
}
