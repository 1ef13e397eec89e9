//! Load-Use Hazard Detection Tests.
//!
//! Verifies that the hazard unit stalls the operand stage exactly when a
//! consumer needs a value an in-flight load (or, without forwarding, any
//! in-flight producer) has not delivered yet.

use pipesim_core::catalog::ProcessorId;
use pipesim_core::core::pipeline::hazards::HazardUnit;
use pipesim_core::core::pipeline::shape::{BranchResolution, PipelineShape, Xlen};
use pipesim_core::core::pipeline::signals::HazardSignals;
use pipesim_core::isa::instruction::Instruction;
use pretty_assertions::assert_eq;

use crate::common::builder::snapshot::{SnapshotBuilder, alu, branch, load};
use crate::common::harness::TestContext;

fn unit() -> HazardUnit {
    HazardUnit::new(&PipelineShape::five_stage(Xlen::X32)).unwrap()
}

fn unit_without_forwarding() -> HazardUnit {
    let shape = PipelineShape {
        forwarding: false,
        ..PipelineShape::five_stage(Xlen::X32)
    };
    HazardUnit::new(&shape).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Basic load-use detection
// ══════════════════════════════════════════════════════════

#[test]
fn stall_when_load_rd_matches_rs1() {
    let snap = SnapshotBuilder::new()
        .decode(alu(2, 5, 0))
        .execute(load(5, 1))
        .build();
    let signals = unit().evaluate(&snap);
    assert!(signals.load_use_hazard, "Load x5, then use x5 as rs1 → stall");
    assert_eq!(
        signals,
        HazardSignals {
            stall_fetch: true,
            clear_decode_execute_latch: true,
            load_use_hazard: true,
            ..HazardSignals::default()
        }
    );
}

#[test]
fn stall_when_load_rd_matches_rs2() {
    let snap = SnapshotBuilder::new()
        .decode(alu(2, 0, 7))
        .execute(load(7, 1))
        .build();
    assert!(unit().evaluate(&snap).load_use_hazard);
}

#[test]
fn no_stall_for_alu_producer() {
    let snap = SnapshotBuilder::new()
        .decode(alu(2, 5, 5))
        .execute(alu(5, 1, 1))
        .build();
    assert!(!unit().evaluate(&snap).any());
}

#[test]
fn no_stall_for_load_into_x0() {
    let snap = SnapshotBuilder::new()
        .decode(alu(2, 0, 0))
        .execute(load(0, 1))
        .build();
    assert!(!unit().evaluate(&snap).any());
}

#[test]
fn no_stall_once_load_reaches_memory() {
    let snap = SnapshotBuilder::new()
        .decode(alu(2, 5, 0))
        .memory(load(5, 1))
        .build();
    assert!(!unit().evaluate(&snap).load_use_hazard);
}

// ══════════════════════════════════════════════════════════
// 2. Branches compared in decode
// ══════════════════════════════════════════════════════════

#[test]
fn decode_branch_waits_for_load_in_memory() {
    let shape = PipelineShape {
        branch_resolution: BranchResolution::Decode,
        ..PipelineShape::five_stage(Xlen::X32)
    };
    let snap = SnapshotBuilder::new()
        .decode(branch(5, 0))
        .memory(load(5, 1))
        .build();
    assert!(HazardUnit::new(&shape).unwrap().evaluate(&snap).load_use_hazard);
    // The same pair is harmless when branches resolve in execute.
    assert!(!unit().evaluate(&snap).load_use_hazard);
}

// ══════════════════════════════════════════════════════════
// 3. No forwarding unit
// ══════════════════════════════════════════════════════════

#[test]
fn unforwarded_producer_stalls_in_every_stage() {
    let hz = unit_without_forwarding();
    for snap in [
        SnapshotBuilder::new().decode(alu(2, 5, 0)).execute(alu(5, 1, 1)).build(),
        SnapshotBuilder::new().decode(alu(2, 5, 0)).memory(alu(5, 1, 1)).build(),
        SnapshotBuilder::new().decode(alu(2, 0, 5)).writeback(alu(5, 1, 1)).build(),
    ] {
        assert!(hz.evaluate(&snap).stall_fetch, "{snap:?}");
    }
}

#[test]
fn no_hazard_unit_without_detection() {
    let shape = PipelineShape {
        hazard_detection: false,
        ..PipelineShape::five_stage(Xlen::X32)
    };
    assert!(HazardUnit::new(&shape).is_none());
}

// ══════════════════════════════════════════════════════════
// 4. End to end
// ══════════════════════════════════════════════════════════

#[test]
fn load_use_costs_one_cycle() {
    let dependent = [Instruction::lw(1, 0, 0), Instruction::add(2, 1, 1)];
    let independent = [Instruction::lw(1, 0, 0), Instruction::add(2, 3, 3)];

    let mut ctx = TestContext::processor(ProcessorId::RV32_5S, &dependent).with_word(0, 7);
    let _ = ctx.run();
    assert_eq!(ctx.get_reg(2), 14);
    assert_eq!(ctx.pipeline.stats().stalls_data, 1);
    let stalled = ctx.pipeline.cycle();

    let mut ctx = TestContext::processor(ProcessorId::RV32_5S, &independent).with_word(0, 7);
    let _ = ctx.run();
    assert_eq!(ctx.pipeline.stats().stalls_data, 0);
    assert_eq!(stalled, ctx.pipeline.cycle() + 1);
}

#[test]
fn load_use_bubble_then_memory_forward() {
    let prog = [Instruction::lw(1, 0, 0), Instruction::add(2, 1, 1)];
    let mut ctx = TestContext::processor(ProcessorId::RV32_5S, &prog).with_word(0, 7);
    ctx.step(3);
    assert!(ctx.pipeline.hazards().load_use_hazard);
    // The bubble sits in execute while the load moves on to memory.
    assert!(ctx.pipeline.stage(2).is_empty());
    assert_eq!(ctx.pipeline.stage(1)[0].inst, prog[1]);
    ctx.step(1);
    assert!(!ctx.pipeline.hazards().any());
    assert!(
        ctx.pipeline
            .forwarding_log()
            .iter()
            .all(|ev| ev.source.name() == "MEM")
    );
}
