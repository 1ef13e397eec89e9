//! Branch Resolution Unit (BRU).
//!
//! Computes the outcome of branches and jumps from their (possibly forwarded)
//! operands. The pipeline predicts not-taken, so there is no predictor state:
//! an outcome is either a fall-through or a redirect.

use crate::core::pipeline::shape::Xlen;
use crate::isa::instruction::{Instruction, Opcode};

/// Bit mask to ensure `JALR` target addresses are 2-byte aligned.
const JALR_ALIGNMENT_MASK: u64 = !1;

/// Resolved control transfer of one branch or jump.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BranchOutcome {
    /// PC of the branch instruction.
    pub pc: u64,
    /// Control leaves the fall-through path.
    pub taken: bool,
    /// Destination when taken.
    pub target: u64,
}

/// Branch resolution unit.
#[derive(Debug)]
pub struct BranchUnit;

impl BranchUnit {
    /// Resolves a control-transfer instruction.
    ///
    /// # Arguments
    ///
    /// * `inst` - The instruction.
    /// * `pc`   - Its address.
    /// * `rv1`  - Value of the first source operand.
    /// * `rv2`  - Value of the second source operand.
    /// * `xlen` - Register width used for address arithmetic.
    ///
    /// # Returns
    ///
    /// `None` if `inst` is not a branch or jump.
    pub fn resolve(
        inst: &Instruction,
        pc: u64,
        rv1: u64,
        rv2: u64,
        xlen: Xlen,
    ) -> Option<BranchOutcome> {
        let relative = xlen.normalize(pc.wrapping_add(inst.imm as u64));
        let (taken, target) = match inst.op {
            Opcode::Jal => (true, relative),
            Opcode::Jalr => (
                true,
                xlen.normalize(rv1.wrapping_add(inst.imm as u64)) & JALR_ALIGNMENT_MASK,
            ),
            Opcode::Beq => (rv1 == rv2, relative),
            Opcode::Bne => (rv1 != rv2, relative),
            Opcode::Blt => (((rv1 as i64) < (rv2 as i64)), relative),
            Opcode::Bge => (((rv1 as i64) >= (rv2 as i64)), relative),
            Opcode::Bltu => ((rv1 < rv2), relative),
            Opcode::Bgeu => ((rv1 >= rv2), relative),
            _ => return None,
        };
        Some(BranchOutcome { pc, taken, target })
    }
}
