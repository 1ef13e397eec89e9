//! Operand Read Stage.
//!
//! This module implements the stage that reads the register file (ID on five-stage
//! datapaths, II on the dual-issue datapath). It performs the following:
//! 1. **Register Read:** Fetches committed source values.
//! 2. **Operand Bypass:** Replaces them with in-flight results as chosen by the
//!    forwarding selectors.
//! 3. **Early Branch Resolution:** Computes branch outcomes from the bypassed
//!    branch operands when the datapath compares branches here.

use crate::common::reg::RegisterFile;
use crate::core::pipeline::latches::InFlight;
use crate::core::pipeline::shape::Xlen;
use crate::core::pipeline::signals::{ForwardingSelectors, ForwardingSource, OperandSelect};
use crate::core::units::bru::{BranchOutcome, BranchUnit};

/// Results available for bypass this cycle, one slice per producing stage.
#[derive(Clone, Copy, Debug)]
pub struct Bypass<'a> {
    /// Execute-stage outputs computed this cycle.
    pub execute: &'a [InFlight],
    /// Memory-stage outputs (loaded data for loads).
    pub memory: &'a [InFlight],
    /// Instructions being written back.
    pub writeback: &'a [InFlight],
}

impl Bypass<'_> {
    /// Value of register `idx` as selected by `sel`.
    ///
    /// Falls back to the register file if the selected lane is empty.
    pub fn read(&self, sel: OperandSelect, idx: u8, regs: &dyn RegisterFile) -> u64 {
        let lanes = match sel.source {
            ForwardingSource::DecodeStage => return regs.read(idx),
            ForwardingSource::ExecuteStage => self.execute,
            ForwardingSource::MemoryStage => self.memory,
            ForwardingSource::WritebackStage => self.writeback,
        };
        lanes
            .get(sel.lane)
            .map_or_else(|| regs.read(idx), |entry| entry.result)
    }
}

/// Executes the operand read stage.
///
/// # Arguments
///
/// * `entries`   - Instructions in the stage, oldest first.
/// * `regs`      - Committed register file.
/// * `selectors` - Forwarding selectors for this cycle.
/// * `bypass`    - In-flight results.
///
/// # Returns
///
/// The entries with `rv1`/`rv2` filled in, ready for the execute latch.
pub fn decode_stage(
    entries: &[InFlight],
    regs: &dyn RegisterFile,
    selectors: &ForwardingSelectors,
    bypass: &Bypass<'_>,
) -> Vec<InFlight> {
    entries
        .iter()
        .enumerate()
        .map(|(lane, entry)| {
            let sel = selectors.lane(lane);
            let mut out = entry.clone();
            out.rv1 = bypass.read(sel.op1, entry.inst.src1(), regs);
            out.rv2 = bypass.read(sel.op2, entry.inst.src2(), regs);
            out
        })
        .collect()
}

/// Resolves a branch compared in the operand stage.
///
/// Uses the branch-operand selectors when present and the ALU selectors
/// otherwise; both come from the same priority chain.
///
/// # Returns
///
/// The outcome of the oldest control transfer in the stage, if any.
pub fn resolve_early_branch(
    entries: &[InFlight],
    regs: &dyn RegisterFile,
    selectors: &ForwardingSelectors,
    bypass: &Bypass<'_>,
    xlen: Xlen,
) -> Option<BranchOutcome> {
    entries.iter().enumerate().find_map(|(lane, entry)| {
        if !entry.inst.op.is_branch_or_jump() {
            return None;
        }
        let sel = selectors.lane(lane);
        let a = bypass.read(sel.branch_op1.unwrap_or(sel.op1), entry.inst.src1(), regs);
        let b = bypass.read(sel.branch_op2.unwrap_or(sel.op2), entry.inst.src2(), regs);
        BranchUnit::resolve(&entry.inst, entry.pc, a, b, xlen)
    })
}
