//! RISC-V General-Purpose Register File.
//!
//! This module implements the integer register file read by the operand stage and
//! written at commit. It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`).
//! 2. **Invariant Enforcement:** Ensures that register `x0` is hardwired to zero.

use crate::common::reg::{NUM_REGS, RegisterFile};

/// General-Purpose Register file.
///
/// Register `x0` is hardwired to zero and cannot be modified. Indices must be below
/// `NUM_REGS`; an out-of-range index panics instead of aliasing another register.
/// Programs are validated before they reach the register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u64; NUM_REGS],
}

impl Gpr {
    /// Creates a new general-purpose register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_REGS],
        }
    }

    /// Returns a copy of all 32 registers, `x0` first.
    pub const fn snapshot(&self) -> [u64; NUM_REGS] {
        self.regs
    }
}

impl RegisterFile for Gpr {
    fn read(&self, idx: u8) -> u64 {
        let idx = usize::from(idx);
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    fn write(&mut self, idx: u8, val: u64) {
        let idx = usize::from(idx);
        if idx != 0 {
            self.regs[idx] = val;
        }
    }
}
