//! Pipeline Register Tests.
//!
//! Verifies the clear/enable contract of stage latches and how the orchestrator
//! drives it under stalls and squashes.

use pipesim_core::catalog::ProcessorId;
use pipesim_core::core::pipeline::Status;
use pipesim_core::core::pipeline::latches::{
    InFlight, LatchControl, PipelineRegister, StageLatch, StageRegister,
};
use pipesim_core::core::pipeline::shape::Probe;
use pipesim_core::core::pipeline::traits::PipelineLatch;
use pipesim_core::isa::instruction::Instruction;
use rstest::rstest;

use crate::common::harness::TestContext;

fn entry(pc: u64) -> InFlight {
    InFlight {
        pc,
        inst: Instruction::nop(),
        ..InFlight::default()
    }
}

#[rstest]
#[case(LatchControl::PASS, Some(5))]
#[case(LatchControl::HOLD, Some(1))]
#[case(LatchControl::CLEAR, None)]
#[case(LatchControl::new(true, false), None)]
fn control_truth_table(#[case] ctrl: LatchControl, #[case] expect: Option<u64>) {
    let mut reg = PipelineRegister::<Option<u64>>::new();
    reg.drive(Some(1));
    reg.apply(LatchControl::PASS);
    reg.drive(Some(5));
    reg.apply(ctrl);
    assert_eq!(*reg.get(), expect);
}

#[test]
fn reset_drops_driven_input() {
    let mut reg = StageRegister::new(false);
    reg.drive(StageLatch::with(vec![entry(0)]), None);
    reg.reset();
    reg.advance(LatchControl::PASS);
    assert!(reg.entries().is_empty());
}

#[test]
fn stage_latch_flush() {
    let mut latch = StageLatch::with(vec![entry(0), entry(4)]);
    assert_eq!(latch.len(), 2);
    latch.flush();
    assert!(latch.is_empty());
}

#[test]
fn memory_boundary_carries_branch_flag_only_for_memory_resolution() {
    let ctx = TestContext::processor(ProcessorId::RV32_5S_3S, &[]);
    assert!(ctx.pipeline.shape().probes().contains(Probe::RegisteredBranchFlag));
    let ctx = TestContext::processor(ProcessorId::RV32_5S, &[]);
    assert!(!ctx.pipeline.shape().probes().contains(Probe::RegisteredBranchFlag));
}

#[test]
fn stall_holds_consumer_in_decode() {
    let prog = [
        Instruction::lw(1, 0, 0),
        Instruction::add(2, 1, 1),
        Instruction::addi(3, 0, 3),
    ];
    let mut ctx = TestContext::processor(ProcessorId::RV32_5S, &prog);
    ctx.step(3);
    // The fetch of cycle 3 is not latched and the PC does not move.
    assert_eq!(ctx.pipeline.stage(1)[0].pc, 4);
    assert_eq!(ctx.pipeline.pc(), 8);
    assert_eq!(ctx.pipeline.occupancy(), "ID:0x4 EX:- MEM:0x0 WB:-");
    ctx.step(1);
    assert_eq!(ctx.pipeline.stage(1)[0].pc, 8);
    assert_eq!(ctx.pipeline.stage(2)[0].pc, 4);
    assert_eq!(ctx.pipeline.occupancy(), "ID:0x8 EX:0x4 MEM:- WB:0x0");
}

#[test]
fn empty_program_drains_immediately() {
    let mut ctx = TestContext::processor(ProcessorId::RV32_5S, &[]);
    assert_eq!(ctx.run(), Status::Drained);
    assert_eq!(ctx.pipeline.cycle(), 1);
}

#[test]
fn stage_latch_snapshots_follow_lane_order() {
    let latch = StageLatch::with(vec![
        InFlight {
            inst: Instruction::lw(1, 2, 0),
            ..InFlight::default()
        },
        InFlight {
            inst: Instruction::add(3, 1, 4),
            ..InFlight::default()
        },
    ]);
    let snaps = latch.snapshots();
    assert_eq!(snaps.len(), 2);
    assert!(snaps[0].mem_read && snaps[0].will_write());
    assert!(snaps[1].reads(1) && !snaps[1].mem_read);
    assert!(StageLatch::default().snapshots().is_empty());
}

#[test]
fn pipeline_snapshot_reads_the_latches() {
    let prog = [
        Instruction::lw(1, 0, 0),
        Instruction::add(2, 1, 1),
        Instruction::addi(3, 0, 3),
    ];
    let mut ctx = TestContext::processor(ProcessorId::RV32_5S, &prog);
    ctx.step(2);
    let snap = ctx.pipeline.snapshot();
    assert_eq!(snap.decode.len(), 1);
    assert!(snap.decode[0].reads(1));
    assert!(snap.execute[0].mem_read);
    assert!(snap.memory.is_empty() && snap.writeback.is_empty());
}
