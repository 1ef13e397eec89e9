//! Program images and loading.
//!
//! This module provides the instruction store fetched by the pipeline. It performs:
//! 1. **Validation:** Every instruction is range-checked once, when the program is built.
//! 2. **Fetch:** Word-aligned lookups by program counter.
//! 3. **Loading:** Reads JSON program files (`{"base": 0, "instructions": [...]}`).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::{ConfigError, SimError};
use crate::isa::instruction::Instruction;

/// Size of every instruction in bytes.
pub const INST_BYTES: u64 = 4;

/// A validated, immutable sequence of instructions at a base address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    base: u64,
    instructions: Vec<Instruction>,
}

/// On-disk form of a program.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProgramFile {
    #[serde(default)]
    base: u64,
    instructions: Vec<Instruction>,
}

impl Program {
    /// Builds a program, rejecting out-of-range register indices.
    ///
    /// # Arguments
    ///
    /// * `base` - Address of the first instruction; must be 4-byte aligned, and
    ///   the whole program must end at or below `u64::MAX`.
    /// * `instructions` - Instructions in program order.
    ///
    /// # Returns
    ///
    /// The program, or the first [`ConfigError`] found.
    pub fn new(base: u64, instructions: Vec<Instruction>) -> Result<Self, ConfigError> {
        if base % INST_BYTES != 0 {
            return Err(ConfigError::MisalignedBase(base));
        }
        let len = instructions.len();
        let fits = u64::try_from(len)
            .ok()
            .and_then(|n| n.checked_mul(INST_BYTES))
            .and_then(|size| base.checked_add(size))
            .is_some();
        if !fits {
            return Err(ConfigError::ProgramOverflow { base, len });
        }
        for (position, inst) in instructions.iter().enumerate() {
            inst.validate(position)?;
        }
        Ok(Self { base, instructions })
    }

    /// Parses a program from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file: ProgramFile = serde_json::from_str(text)?;
        Self::new(file.base, file.instructions)
    }

    /// Address of the first instruction.
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Address one past the last instruction.
    pub fn end(&self) -> u64 {
        // Checked in `new`.
        self.base
            .wrapping_add((self.instructions.len() as u64).wrapping_mul(INST_BYTES))
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns `true` if `pc` addresses an instruction of this program.
    pub fn contains(&self, pc: u64) -> bool {
        self.fetch(pc).is_some()
    }

    /// Fetches the instruction at `pc`.
    ///
    /// # Returns
    ///
    /// `None` for misaligned addresses and addresses outside the program.
    pub fn fetch(&self, pc: u64) -> Option<Instruction> {
        if pc < self.base || (pc - self.base) % INST_BYTES != 0 {
            return None;
        }
        let idx = usize::try_from((pc - self.base) / INST_BYTES).ok()?;
        self.instructions.get(idx).copied()
    }
}

/// Loads a JSON program file from disk.
///
/// # Arguments
///
/// * `path` - Path to the program file.
pub fn load_program(path: impl AsRef<Path>) -> Result<Program, SimError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Program::from_json(&text)?)
}
