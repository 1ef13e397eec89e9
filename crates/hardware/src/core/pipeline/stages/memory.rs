//! Memory Access (MEM) Stage.
//!
//! Loads read data memory combinationally; stores are returned to the caller and
//! applied at the tick so that nothing observes them before the cycle ends.

use crate::core::pipeline::latches::InFlight;
use crate::core::pipeline::shape::Xlen;
use crate::core::units::lsu::DataMemory;

/// A store to apply at the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreOp {
    /// Effective address.
    pub addr: u64,
    /// Value to store (low word).
    pub value: u64,
}

/// Output of the memory stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemOutput {
    /// Entries for the write-back latch; loads carry the loaded value in `result`.
    pub entries: Vec<InFlight>,
    /// Stores to commit.
    pub stores: Vec<StoreOp>,
}

/// Executes the memory stage.
///
/// # Arguments
///
/// * `entries` - Instructions in the stage; `result` holds the effective address.
/// * `memory`  - Data memory as committed at the end of the previous cycle.
/// * `xlen`    - Register width for load sign extension.
pub fn mem_stage(entries: &[InFlight], memory: &DataMemory, xlen: Xlen) -> MemOutput {
    let mut out = MemOutput::default();
    for entry in entries {
        let mut next = entry.clone();
        if entry.inst.op.is_load() {
            next.result = memory.load_word(entry.result, xlen);
        } else if entry.inst.op.is_store() {
            out.stores.push(StoreOp {
                addr: entry.result,
                value: entry.rv2,
            });
        }
        out.entries.push(next);
    }
    out
}
