//! Hazard Detection Unit.
//!
//! This module decides, once per cycle, whether the pipeline must stall or squash
//! to stay architecturally correct. It provides:
//! 1. **Load-Use Detection:** A consumer in the operand stage needs a value that an
//!    in-flight load has not produced yet.
//! 2. **Unforwarded Data Hazards:** Without a forwarding unit, any pending write to a
//!    source register stalls the consumer until it has been written back.
//! 3. **System-Call Draining:** An `ecall` in execute waits until no older register
//!    write is still pending, then squashes everything fetched behind it once.
//!
//! The unit is a pure function of a [`PipelineSnapshot`]; it holds only the wiring
//! options chosen at construction.

use crate::core::pipeline::shape::{PipelineShape, Probe};
use crate::core::pipeline::signals::{HazardSignals, PipelineSnapshot, StageSnapshot};

/// Hazard detection unit for one pipeline shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HazardUnit {
    forwarding: bool,
    decode_branch_operands: bool,
}

impl HazardUnit {
    /// Builds the unit for `shape`.
    ///
    /// # Returns
    ///
    /// `None` if the shape has no hazard detection wired in.
    pub fn new(shape: &PipelineShape) -> Option<Self> {
        shape.hazard_detection.then(|| Self {
            forwarding: shape.forwarding,
            decode_branch_operands: shape.probes().contains(Probe::DecodeBranchOperands),
        })
    }

    /// Evaluates every hazard signal for one cycle.
    ///
    /// # Arguments
    ///
    /// * `snap` - Stage contents as of the start of the cycle.
    ///
    /// # Returns
    ///
    /// The composed stall and clear outputs. `flush_branch` is left low; branch
    /// squashes are raised by the control path.
    pub fn evaluate(&self, snap: &PipelineSnapshot) -> HazardSignals {
        let load_use = self.load_use_hazard(snap);
        let system_call = Self::system_call_hazard(snap);
        let release = Self::system_call_in_execute(snap) && !system_call;

        HazardSignals {
            stall_fetch: load_use || system_call,
            stall_decode_latch: system_call,
            // Load-use clear vs. system-call hold: clears normally dominate stalls,
            // but a held ecall sits in the latch feeding execute and a bubble there
            // would drop it. The clear is masked while the call is held.
            clear_decode_execute_latch: load_use && !system_call,
            clear_execute_memory_latch: system_call,
            stall_system_call: system_call,
            flush_system_call: release,
            flush_branch: false,
            load_use_hazard: load_use,
            system_call_hazard: system_call,
        }
    }

    /// Returns `true` if an operand-stage consumer must wait for a producer.
    ///
    /// With forwarding, only loads in execute (and, for branches compared in the
    /// operand stage, loads in memory) are too late. Without forwarding every
    /// pending producer in execute, memory, or write-back is.
    pub fn load_use_hazard(&self, snap: &PipelineSnapshot) -> bool {
        snap.decode.iter().any(|consumer| {
            if self.forwarding {
                let ex_load = snap
                    .execute
                    .iter()
                    .any(|p| p.mem_read && feeds(p, consumer));
                let mem_load_into_branch = self.decode_branch_operands
                    && consumer.is_branch_or_jump()
                    && snap.memory.iter().any(|p| p.mem_read && feeds(p, consumer));
                ex_load || mem_load_into_branch
            } else {
                snap.execute
                    .iter()
                    .chain(&snap.memory)
                    .chain(&snap.writeback)
                    .any(|p| feeds(p, consumer))
            }
        })
    }

    /// Returns `true` while an `ecall` in execute still has older pending writes.
    ///
    /// Older instructions are those in memory and write-back, plus the lanes ahead
    /// of the `ecall` in its own execute bundle.
    pub fn system_call_hazard(snap: &PipelineSnapshot) -> bool {
        let Some(pos) = snap.execute.iter().position(|s| s.opcode.is_system_call()) else {
            return false;
        };
        snap.execute[..pos]
            .iter()
            .chain(&snap.memory)
            .chain(&snap.writeback)
            .any(StageSnapshot::will_write)
    }

    /// Returns `true` if execute holds an `ecall`.
    pub fn system_call_in_execute(snap: &PipelineSnapshot) -> bool {
        snap.execute.iter().any(|s| s.opcode.is_system_call())
    }
}

/// Returns `true` if `producer` will write a register `consumer` reads.
fn feeds(producer: &StageSnapshot, consumer: &StageSnapshot) -> bool {
    producer.will_write() && consumer.reads(producer.dest)
}
