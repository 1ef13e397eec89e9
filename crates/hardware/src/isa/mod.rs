//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the pre-decoded instruction records consumed by the pipeline, the
//! ABI register names used by system calls, and the disassembler used in traces.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Display implementation rendering instructions as assembler text.
pub mod disasm;

/// Opcodes and decoded instruction records.
pub mod instruction;

pub use instruction::{Instruction, Opcode};
