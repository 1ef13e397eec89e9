//! Pipeline registers for inter-stage communication.
//!
//! This module defines the storage elements between stages:
//! 1. **Latch Contract:** [`PipelineRegister`] holds one value per stage boundary and
//!    updates only at the tick, under a clear/enable pair where clear dominates.
//! 2. **Instruction Flow:** [`StageLatch`] carries the in-flight instructions of one
//!    boundary, one entry per occupied lane.
//! 3. **Extended Boundaries:** [`StageRegister`] composes extra registered fields
//!    (the branch outcome at the execute/memory boundary) next to the base latch.

use crate::core::pipeline::signals::StageSnapshot;
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::bru::BranchOutcome;
use crate::isa::instruction::Instruction;

/// Clear and enable inputs of a pipeline register for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatchControl {
    /// Force the reset value.
    pub clear: bool,
    /// Accept the driven input; otherwise hold.
    pub enable: bool,
}

impl LatchControl {
    /// Normal advance.
    pub const PASS: Self = Self {
        clear: false,
        enable: true,
    };

    /// Hold the current value.
    pub const HOLD: Self = Self {
        clear: false,
        enable: false,
    };

    /// Insert a bubble.
    pub const CLEAR: Self = Self {
        clear: true,
        enable: true,
    };

    /// Builds a control pair.
    pub const fn new(clear: bool, enable: bool) -> Self {
        Self { clear, enable }
    }
}

impl Default for LatchControl {
    fn default() -> Self {
        Self::PASS
    }
}

/// A clocked register with a reset value of `T::default()`.
///
/// The input is driven during the combinational phase of a cycle and becomes
/// visible on the output only after [`PipelineRegister::advance`].
#[derive(Clone, Debug, Default)]
pub struct PipelineRegister<T> {
    current: T,
    input: Option<T>,
}

impl<T: Default> PipelineRegister<T> {
    /// Creates a register holding its reset value.
    pub fn new() -> Self {
        Self {
            current: T::default(),
            input: None,
        }
    }

    /// Current output.
    pub const fn get(&self) -> &T {
        &self.current
    }

    /// Drives the D input for the next tick, replacing any earlier drive.
    pub fn drive(&mut self, input: T) {
        self.input = Some(input);
    }

    /// Clocks the register.
    ///
    /// `clear` forces the reset value whatever `enable` says. Otherwise a disabled
    /// register holds, and an enabled one takes the driven input (the reset value
    /// if nothing was driven). The driven input is consumed either way.
    pub fn advance(&mut self, clear: bool, enable: bool) {
        let input = self.input.take();
        if clear {
            self.current = T::default();
        } else if enable {
            self.current = input.unwrap_or_default();
        }
    }

    /// Clocks the register with a [`LatchControl`].
    pub fn apply(&mut self, control: LatchControl) {
        self.advance(control.clear, control.enable);
    }

    /// Returns to the reset value and drops any driven input.
    pub fn reset(&mut self) {
        self.current = T::default();
        self.input = None;
    }
}

/// An instruction travelling down the pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InFlight {
    /// Fetch order, starting at 1.
    pub seq: u64,
    /// Program counter of the instruction.
    pub pc: u64,
    /// The instruction.
    pub inst: Instruction,
    /// First operand value, after forwarding.
    pub rv1: u64,
    /// Second operand value (store data for stores), after forwarding.
    pub rv2: u64,
    /// Stage result: ALU value, effective address, link address, or loaded data.
    pub result: u64,
}

impl InFlight {
    /// Hazard-relevant view of this instruction.
    pub const fn snapshot(&self) -> StageSnapshot {
        StageSnapshot::of(&self.inst)
    }
}

/// Contents of one stage boundary; an empty latch is a bubble.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageLatch {
    /// Occupied lanes, oldest first.
    pub entries: Vec<InFlight>,
}

impl StageLatch {
    /// Latch holding the given entries.
    pub const fn with(entries: Vec<InFlight>) -> Self {
        Self { entries }
    }

    /// Snapshots of every occupied lane.
    pub fn snapshots(&self) -> Vec<StageSnapshot> {
        self.entries.iter().map(InFlight::snapshot).collect()
    }
}

impl PipelineLatch for StageLatch {
    fn flush(&mut self) {
        self.entries.clear();
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Register feeding one stage.
///
/// The boundary into the memory stage of memory-resolution shapes also registers
/// the branch outcome computed in execute. Both parts share one control pair, so
/// a stall or clear of the boundary applies to the outcome exactly as it applies
/// to the instruction.
#[derive(Clone, Debug, Default)]
pub struct StageRegister {
    /// Instructions crossing the boundary.
    pub latch: PipelineRegister<StageLatch>,
    /// Registered branch outcome, when the boundary carries one.
    pub branch: Option<PipelineRegister<Option<BranchOutcome>>>,
}

impl StageRegister {
    /// Creates an empty register, optionally carrying a branch outcome.
    pub fn new(with_branch_flag: bool) -> Self {
        Self {
            latch: PipelineRegister::new(),
            branch: with_branch_flag.then(PipelineRegister::new),
        }
    }

    /// In-flight instructions on the output side.
    pub fn entries(&self) -> &[InFlight] {
        &self.latch.get().entries
    }

    /// Registered branch outcome, if this boundary carries one and it is set.
    pub fn branch_outcome(&self) -> Option<BranchOutcome> {
        self.branch.as_ref().and_then(|reg| *reg.get())
    }

    /// Drives the next contents.
    pub fn drive(&mut self, latch: StageLatch, outcome: Option<BranchOutcome>) {
        self.latch.drive(latch);
        if let Some(reg) = self.branch.as_mut() {
            reg.drive(outcome);
        }
    }

    /// Clocks every part of the boundary with the same control.
    pub fn advance(&mut self, control: LatchControl) {
        self.latch.apply(control);
        if let Some(reg) = self.branch.as_mut() {
            reg.apply(control);
        }
    }

    /// Empties the boundary.
    pub fn reset(&mut self) {
        self.latch.reset();
        if let Some(reg) = self.branch.as_mut() {
            reg.reset();
        }
    }
}
