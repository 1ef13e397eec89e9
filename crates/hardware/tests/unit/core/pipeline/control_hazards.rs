//! Control Hazard Tests.
//!
//! Verifies predict-not-taken squashes for every resolution stage and the
//! delayed-branch contract: exactly `slots` fall-through instructions complete
//! after a taken transfer, however the shadow was fetched.

use pipesim_core::catalog::ProcessorId;
use pipesim_core::core::pipeline::control::{ControlDecision, PendingRedirect, decide};
use pipesim_core::core::pipeline::shape::{
    BranchResolution, BranchStrategy, PipelineShape, Xlen,
};
use pipesim_core::core::units::bru::BranchOutcome;
use pipesim_core::isa::instruction::Instruction;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::program::delay_slots;
use crate::common::harness::TestContext;

fn taken(target: u64) -> Option<BranchOutcome> {
    Some(BranchOutcome {
        pc: 0,
        taken: true,
        target,
    })
}

// ══════════════════════════════════════════════════════════
// 1. Decisions
// ══════════════════════════════════════════════════════════

#[test]
fn predict_not_taken_flushes_on_taken() {
    let shape = PipelineShape::five_stage(Xlen::X32);
    assert_eq!(
        decide(&shape, taken(40), 2),
        ControlDecision::Flush { target: 40 }
    );
    assert_eq!(decide(&shape, None, 0), ControlDecision::Continue);
}

#[test]
fn delayed_branch_waits_for_missing_slots() {
    let shape = PipelineShape {
        branch_strategy: BranchStrategy::DelayedBranch,
        branch_delay_slots: 3,
        branch_resolution: BranchResolution::Memory,
        ..PipelineShape::five_stage(Xlen::X32)
    };
    assert_eq!(
        decide(&shape, taken(24), 2),
        ControlDecision::Delayed(PendingRedirect {
            target: 24,
            remaining: 1
        })
    );
}

#[test]
fn pending_redirect_counts_down() {
    let mut pending = PendingRedirect {
        target: 8,
        remaining: 2,
    };
    assert!(!pending.consume(1));
    assert!(pending.consume(1));
}

// ══════════════════════════════════════════════════════════
// 2. Shadow behaviour per processor
// ══════════════════════════════════════════════════════════

/// Registers x2, x3, x5 are the three shadow slots; x6 is never reached.
#[rstest]
#[case::pnt_execute(ProcessorId::RV32_5S, [0, 0, 0])]
#[case::pnt_decode(ProcessorId::RV32_5S_1S, [0, 0, 0])]
#[case::pnt_memory(ProcessorId::RV32_5S_3S, [0, 0, 0])]
#[case::pnt_dual(ProcessorId::RV32_6S_DUAL, [0, 0, 0])]
#[case::one_slot(ProcessorId::RV32_5S_1S_DB, [2, 0, 0])]
#[case::two_slots(ProcessorId::RV32_5S_2S_DB, [2, 3, 0])]
#[case::three_slots(ProcessorId::RV32_5S_3S_DB, [2, 3, 5])]
#[case::three_slots_rv64(ProcessorId::RV64_5S_3S_DB, [2, 3, 5])]
fn shadow_slots(#[case] id: ProcessorId, #[case] slots: [u64; 3]) {
    let mut ctx = TestContext::processor(id, &delay_slots());
    let _ = ctx.run();
    assert_eq!([ctx.get_reg(2), ctx.get_reg(3), ctx.get_reg(5)], slots);
    assert_eq!(ctx.get_reg(6), 0, "instruction before the target ran");
    assert_eq!(ctx.get_reg(4), 4, "branch target did not run");
    assert_eq!(ctx.pipeline.stats().branches_taken, 1);
}

#[rstest]
#[case(ProcessorId::RV32_5S_1S, 1)]
#[case(ProcessorId::RV32_5S, 2)]
#[case(ProcessorId::RV32_5S_3S, 3)]
fn squash_count_matches_resolution_stage(#[case] id: ProcessorId, #[case] squashed: u64) {
    let mut ctx = TestContext::processor(id, &delay_slots());
    let _ = ctx.run();
    assert_eq!(ctx.pipeline.stats().flushes_branch, 1);
    assert_eq!(ctx.pipeline.stats().squashed, squashed);
}

#[test]
fn delay_slot_fetched_after_stall_redirects_late() {
    let prog = [
        Instruction::beq(0, 0, 24),
        Instruction::lw(1, 0, 0),
        Instruction::add(2, 1, 1),
        Instruction::addi(3, 0, 3),
        Instruction::addi(6, 0, 6),
        Instruction::addi(7, 0, 7),
        Instruction::addi(4, 0, 4),
    ];
    let mut ctx = TestContext::processor(ProcessorId::RV32_5S_3S_DB, &prog).with_word(0, 21);
    let _ = ctx.run();
    assert_eq!(ctx.pipeline.stats().stalls_data, 1);
    assert_eq!(ctx.pipeline.stats().delay_slot_redirects, 1);
    assert_eq!(ctx.get_reg(2), 42);
    assert_eq!(ctx.get_reg(3), 3);
    assert_eq!((ctx.get_reg(6), ctx.get_reg(7)), (0, 0));
    assert_eq!(ctx.get_reg(4), 4);
}

#[test]
fn delay_slot_past_program_end_is_a_nop() {
    let prog = [Instruction::addi(1, 0, 1), Instruction::beq(0, 0, -4)];
    let mut ctx = TestContext::processor(ProcessorId::RV32_5S_2S_DB, &prog);
    ctx.step(12);
    // The loop keeps running: the slots past the end never fetch anything.
    assert_eq!(ctx.get_reg(1), 1);
    assert!(ctx.pipeline.stats().branches_taken >= 2);
}

#[test]
fn jal_links_and_jalr_returns() {
    let prog = [
        Instruction::jal(1, 12),   // 0: call 12
        Instruction::addi(5, 0, 5), // 4: after return
        Instruction::jal(0, 12),   // 8: skip to end
        Instruction::addi(6, 0, 6), // 12: callee
        Instruction::jalr(0, 1, 0), // 16: return to 4
    ];
    for id in [
        ProcessorId::RV32_SS,
        ProcessorId::RV32_5S,
        ProcessorId::RV32_5S_1S,
        ProcessorId::RV32_5S_3S,
    ] {
        let mut ctx = TestContext::processor(id, &prog);
        let _ = ctx.run();
        assert_eq!(ctx.get_reg(1), 4, "{id}");
        assert_eq!((ctx.get_reg(5), ctx.get_reg(6)), (5, 6), "{id}");
    }
}
