//! Writeback (WB) Stage.
//!
//! Collects the register writes of the instructions leaving the pipeline. The
//! writes are applied at the tick in lane order, so the younger lane wins when
//! both lanes of a bundle target the same register.

use crate::core::pipeline::latches::InFlight;

/// A register write to apply at the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegWrite {
    /// Destination register (never 0).
    pub reg: u8,
    /// Value written.
    pub value: u64,
}

/// Executes the writeback stage.
pub fn wb_stage(entries: &[InFlight]) -> Vec<RegWrite> {
    entries
        .iter()
        .filter(|e| e.inst.dest() != 0)
        .map(|e| RegWrite {
            reg: e.inst.dest(),
            value: e.result,
        })
        .collect()
}
