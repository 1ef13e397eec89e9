//! Operand Forwarding Unit.
//!
//! Selects, for every operand read in the operand stage, whether the value comes
//! from the register file or is bypassed from a younger in-flight producer. The
//! same priority chain serves the ALU operands and, in shapes that compare
//! branches in the operand stage, the branch operands.

use crate::core::pipeline::shape::{PipelineShape, Probe};
use crate::core::pipeline::signals::{
    ForwardingSelectors, ForwardingSource, LaneSelectors, OperandSelect, PipelineSnapshot,
    StageSnapshot,
};

/// One producing stage in a forwarding chain.
pub type Producer<'a> = (ForwardingSource, &'a [StageSnapshot]);

/// Forwarding unit for one pipeline shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForwardingUnit {
    decode_branch_operands: bool,
}

impl ForwardingUnit {
    /// Builds the unit for `shape`.
    ///
    /// # Returns
    ///
    /// `None` if the shape has no forwarding wired in.
    pub fn new(shape: &PipelineShape) -> Option<Self> {
        shape.forwarding.then(|| Self {
            decode_branch_operands: shape.probes().contains(Probe::DecodeBranchOperands),
        })
    }

    /// Computes the selectors for every operand-stage lane.
    pub fn evaluate(&self, snap: &PipelineSnapshot) -> ForwardingSelectors {
        let chain = producer_chain(snap, ForwardingSource::ExecuteStage);
        let lanes = snap
            .decode
            .iter()
            .map(|consumer| {
                let op1 = select_source(consumer.src1, &chain);
                let op2 = select_source(consumer.src2, &chain);
                let (branch_op1, branch_op2) = if self.decode_branch_operands {
                    (Some(op1), Some(op2))
                } else {
                    (None, None)
                };
                LaneSelectors {
                    op1,
                    op2,
                    branch_op1,
                    branch_op2,
                }
            })
            .collect();
        ForwardingSelectors { lanes }
    }
}

/// Producers ordered youngest first, starting at `youngest`.
///
/// # Arguments
///
/// * `snap`     - Stage contents for the cycle.
/// * `youngest` - The youngest stage allowed to forward; older stages follow.
pub fn producer_chain(snap: &PipelineSnapshot, youngest: ForwardingSource) -> Vec<Producer<'_>> {
    [
        (ForwardingSource::ExecuteStage, snap.execute.as_slice()),
        (ForwardingSource::MemoryStage, snap.memory.as_slice()),
        (ForwardingSource::WritebackStage, snap.writeback.as_slice()),
    ]
    .into_iter()
    .filter(|(source, _)| *source >= youngest)
    .collect()
}

/// Youngest-producer-wins selection for one source register.
///
/// Index 0 always reads the register file. Otherwise the first stage of `chain`
/// holding a pending write to `idx` wins, and within that stage the youngest
/// (highest) lane wins. With no producer the register file is read.
pub fn select_source(idx: u8, chain: &[Producer<'_>]) -> OperandSelect {
    if idx == 0 {
        return OperandSelect::REGISTER_FILE;
    }
    chain
        .iter()
        .find_map(|(source, lanes)| {
            lanes
                .iter()
                .rposition(|p| p.writes(idx))
                .map(|lane| OperandSelect {
                    source: *source,
                    lane,
                })
        })
        .unwrap_or(OperandSelect::REGISTER_FILE)
}
