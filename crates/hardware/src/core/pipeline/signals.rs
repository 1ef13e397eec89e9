//! Per-cycle probe views and control outputs.
//!
//! Everything in this module is transient: it is rebuilt from latch contents at
//! the start of each cycle and discarded at the tick. It defines:
//! 1. **Stage Snapshots:** The fields of an in-flight instruction that hazard and
//!    forwarding decisions depend on.
//! 2. **Hazard Signals:** Stall and clear outputs of the hazard unit.
//! 3. **Forwarding Selectors:** The operand multiplexer setting for every operand
//!    read by the operand stage.

use crate::isa::instruction::{Instruction, Opcode};

/// Read-only view of one occupied lane of one stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StageSnapshot {
    /// First source register, or 0 when not read.
    pub src1: u8,
    /// Second source register, or 0 when not read.
    pub src2: u8,
    /// Destination register.
    pub dest: u8,
    /// The instruction writes a register.
    pub reg_write: bool,
    /// The instruction is a load.
    pub mem_read: bool,
    /// Operation class.
    pub opcode: Opcode,
}

impl StageSnapshot {
    /// Builds the snapshot of an instruction.
    pub const fn of(inst: &Instruction) -> Self {
        Self {
            src1: inst.src1(),
            src2: inst.src2(),
            dest: inst.dest(),
            reg_write: inst.op.writes_rd(),
            mem_read: inst.op.is_load(),
            opcode: inst.op,
        }
    }

    /// Returns `true` if the instruction will produce a visible register value.
    ///
    /// Index 0 never counts, whatever `reg_write` says.
    pub const fn will_write(&self) -> bool {
        self.reg_write && self.dest != 0
    }

    /// Returns `true` if this instruction will write `idx` and `idx` is not `x0`.
    pub const fn writes(&self, idx: u8) -> bool {
        idx != 0 && self.will_write() && self.dest == idx
    }

    /// Returns `true` if either source is `idx` and `idx` is not `x0`.
    pub const fn reads(&self, idx: u8) -> bool {
        idx != 0 && (self.src1 == idx || self.src2 == idx)
    }

    /// Returns `true` for branches and jumps.
    pub const fn is_branch_or_jump(&self) -> bool {
        self.opcode.is_branch_or_jump()
    }
}

/// Snapshot of every stage the hazard and forwarding units probe.
///
/// Each field lists occupied lanes oldest first; an empty list is a bubble.
/// `decode` is the stage that reads the register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineSnapshot {
    /// Operand-read stage (ID, or II in the dual-issue datapath).
    pub decode: Vec<StageSnapshot>,
    /// Execute stage.
    pub execute: Vec<StageSnapshot>,
    /// Memory stage.
    pub memory: Vec<StageSnapshot>,
    /// Write-back stage.
    pub writeback: Vec<StageSnapshot>,
}

/// Outputs of the hazard unit for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HazardSignals {
    /// Hold the PC and every latch up to the operand stage.
    pub stall_fetch: bool,
    /// Hold the latch feeding execute (system call being drained).
    pub stall_decode_latch: bool,
    /// Inject a bubble into execute.
    pub clear_decode_execute_latch: bool,
    /// Inject a bubble into memory.
    pub clear_execute_memory_latch: bool,
    /// A system call is held in execute.
    pub stall_system_call: bool,
    /// A held system call proceeds; squash everything younger.
    pub flush_system_call: bool,
    /// A taken branch squashes its fall-through instructions.
    pub flush_branch: bool,
    /// Raw load-use (or unforwarded data) hazard.
    pub load_use_hazard: bool,
    /// Raw system-call hazard.
    pub system_call_hazard: bool,
}

impl HazardSignals {
    /// Returns `true` if any output is asserted.
    pub const fn any(&self) -> bool {
        self.stall_fetch
            || self.stall_decode_latch
            || self.clear_decode_execute_latch
            || self.clear_execute_memory_latch
            || self.stall_system_call
            || self.flush_system_call
            || self.flush_branch
    }
}

/// Where an operand value comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ForwardingSource {
    /// Register file value read in the operand stage.
    #[default]
    DecodeStage,
    /// Result computed in execute this cycle.
    ExecuteStage,
    /// Result leaving the memory stage this cycle.
    MemoryStage,
    /// Result being written back this cycle.
    WritebackStage,
}

impl ForwardingSource {
    /// Short name used in traces and statistics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DecodeStage => "ID",
            Self::ExecuteStage => "EX",
            Self::MemoryStage => "MEM",
            Self::WritebackStage => "WB",
        }
    }
}

/// Multiplexer setting for one operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OperandSelect {
    /// Producing stage.
    pub source: ForwardingSource,
    /// Lane of the producing stage; 0 for [`ForwardingSource::DecodeStage`].
    pub lane: usize,
}

impl OperandSelect {
    /// Register file value.
    pub const REGISTER_FILE: Self = Self {
        source: ForwardingSource::DecodeStage,
        lane: 0,
    };
}

/// Selectors for the operands of one operand-stage lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaneSelectors {
    /// First ALU operand.
    pub op1: OperandSelect,
    /// Second ALU operand.
    pub op2: OperandSelect,
    /// First branch-comparison operand, when branches resolve in the operand stage.
    pub branch_op1: Option<OperandSelect>,
    /// Second branch-comparison operand, when branches resolve in the operand stage.
    pub branch_op2: Option<OperandSelect>,
}

/// Outputs of the forwarding unit for one cycle, one entry per operand-stage lane.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForwardingSelectors {
    /// Per-lane selectors, oldest lane first.
    pub lanes: Vec<LaneSelectors>,
}

impl ForwardingSelectors {
    /// Register-file selection for `lanes` lanes.
    pub fn register_file(lanes: usize) -> Self {
        Self {
            lanes: vec![LaneSelectors::default(); lanes],
        }
    }

    /// Selectors of one lane, or register-file selection if the lane is empty.
    pub fn lane(&self, lane: usize) -> LaneSelectors {
        self.lanes.get(lane).copied().unwrap_or_default()
    }
}

/// A bypass actually taken by an instruction leaving the operand stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForwardingEvent {
    /// Cycle in which the bypass happened.
    pub cycle: u64,
    /// PC of the consuming instruction.
    pub consumer_pc: u64,
    /// Register that was bypassed.
    pub reg: u8,
    /// Producing stage.
    pub source: ForwardingSource,
}
