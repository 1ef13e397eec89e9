//! ALU shift operations.
//!
//! Shift amounts are masked to 5 bits for RV32 and 6 bits for RV64. Right
//! shifts on RV32 operate on the low word so that the vacated bits come from
//! bit 31, not from the sign-extension above it.

use super::AluOp;
use crate::core::pipeline::shape::Xlen;

/// Executes a shift operation.
///
/// # Arguments
///
/// * `op`   - The ALU operation to perform (must be a shift variant).
/// * `a`    - The value to be shifted.
/// * `b`    - The shift amount (upper bits ignored).
/// * `xlen` - Register width.
///
/// # Returns
///
/// The unnormalized result, or `0` for non-shift opcodes.
pub const fn execute(op: AluOp, a: u64, b: u64, xlen: Xlen) -> u64 {
    let sh = (b & xlen.shamt_mask()) as u32;
    match (op, xlen) {
        (AluOp::Sll, _) => a.wrapping_shl(sh),
        (AluOp::Srl, Xlen::X32) => ((a as u32) >> sh) as u64,
        (AluOp::Srl, Xlen::X64) => a >> sh,
        (AluOp::Sra, Xlen::X32) => ((a as i32) >> sh) as i64 as u64,
        (AluOp::Sra, Xlen::X64) => ((a as i64) >> sh) as u64,
        _ => 0,
    }
}
