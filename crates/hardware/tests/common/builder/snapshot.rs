use pipesim_core::core::pipeline::signals::{PipelineSnapshot, StageSnapshot};
use pipesim_core::isa::instruction::{Instruction, Opcode};

/// Snapshot of an ALU instruction writing `rd`.
pub fn alu(rd: u8, rs1: u8, rs2: u8) -> StageSnapshot {
    StageSnapshot::of(&Instruction::add(rd, rs1, rs2))
}

/// Snapshot of a load writing `rd`.
pub fn load(rd: u8, base: u8) -> StageSnapshot {
    StageSnapshot::of(&Instruction::lw(rd, base, 0))
}

/// Snapshot of a conditional branch.
pub fn branch(rs1: u8, rs2: u8) -> StageSnapshot {
    StageSnapshot::of(&Instruction::branch(Opcode::Beq, rs1, rs2, 8))
}

/// Snapshot of an `ecall`.
pub fn ecall() -> StageSnapshot {
    StageSnapshot::of(&Instruction::ecall())
}

/// Fluent builder for a [`PipelineSnapshot`].
#[derive(Debug)]
pub struct SnapshotBuilder(PipelineSnapshot);

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self(PipelineSnapshot::default())
    }

    pub fn decode(mut self, lane: StageSnapshot) -> Self {
        self.0.decode.push(lane);
        self
    }

    pub fn execute(mut self, lane: StageSnapshot) -> Self {
        self.0.execute.push(lane);
        self
    }

    pub fn memory(mut self, lane: StageSnapshot) -> Self {
        self.0.memory.push(lane);
        self
    }

    pub fn writeback(mut self, lane: StageSnapshot) -> Self {
        self.0.writeback.push(lane);
        self
    }

    pub fn build(self) -> PipelineSnapshot {
        self.0
    }
}
