//! Property Tests for the Hazard and Forwarding Units.
//!
//! Randomized stage contents check the invariants every cycle must satisfy,
//! independent of any particular program.

use pipesim_core::core::pipeline::forwarding::{ForwardingUnit, producer_chain, select_source};
use pipesim_core::core::pipeline::hazards::HazardUnit;
use pipesim_core::core::pipeline::latches::PipelineRegister;
use pipesim_core::core::pipeline::shape::{PipelineShape, Xlen};
use pipesim_core::core::pipeline::signals::{
    ForwardingSource, OperandSelect, PipelineSnapshot, StageSnapshot,
};
use pipesim_core::isa::instruction::{Instruction, Opcode};
use proptest::prelude::*;

const NON_MEMORY_OPS: [Opcode; 8] = [
    Opcode::Add,
    Opcode::Sub,
    Opcode::Addi,
    Opcode::Lui,
    Opcode::Beq,
    Opcode::Jal,
    Opcode::Jalr,
    Opcode::Nop,
];

fn snapshot_of(ops: Vec<Opcode>) -> impl Strategy<Value = StageSnapshot> {
    (prop::sample::select(ops), 0..32_u8, 0..32_u8, 0..32_u8).prop_map(|(op, rd, rs1, rs2)| {
        StageSnapshot::of(&Instruction {
            op,
            rd,
            rs1,
            rs2,
            imm: 0,
        })
    })
}

fn lanes(ops: Vec<Opcode>) -> impl Strategy<Value = Vec<StageSnapshot>> {
    prop::collection::vec(snapshot_of(ops), 0..=2)
}

fn any_ops() -> Vec<Opcode> {
    let mut ops = NON_MEMORY_OPS.to_vec();
    ops.extend([Opcode::Lw, Opcode::Sw]);
    ops
}

prop_compose! {
    fn load_free_snapshot()(
        decode in lanes(NON_MEMORY_OPS.to_vec()),
        execute in lanes(NON_MEMORY_OPS.to_vec()),
        memory in lanes(any_ops()),
        writeback in lanes(any_ops()),
    ) -> PipelineSnapshot {
        PipelineSnapshot { decode, execute, memory, writeback }
    }
}

prop_compose! {
    fn ecall_free_snapshot()(
        decode in lanes(any_ops()),
        execute in lanes(any_ops()),
        memory in lanes(any_ops()),
        writeback in lanes(any_ops()),
    ) -> PipelineSnapshot {
        PipelineSnapshot { decode, execute, memory, writeback }
    }
}

fn no_forwarding() -> PipelineShape {
    PipelineShape {
        forwarding: false,
        ..PipelineShape::five_stage(Xlen::X32)
    }
}

proptest! {
    #[test]
    fn forwarding_shape_never_stalls_without_loads_in_execute(snap in load_free_snapshot()) {
        let unit = HazardUnit::new(&PipelineShape::five_stage(Xlen::X32)).unwrap();
        prop_assert!(!unit.evaluate(&snap).any());
    }

    #[test]
    fn consumers_of_x0_never_stall(mut snap in ecall_free_snapshot()) {
        for consumer in &mut snap.decode {
            consumer.src1 = 0;
            consumer.src2 = 0;
        }
        for shape in [PipelineShape::five_stage(Xlen::X32), no_forwarding()] {
            let unit = HazardUnit::new(&shape).unwrap();
            prop_assert!(!unit.evaluate(&snap).any());
        }
    }

    #[test]
    fn selection_is_the_youngest_writer(snap in ecall_free_snapshot(), idx in 0..32_u8) {
        let chain = producer_chain(&snap, ForwardingSource::ExecuteStage);
        let sel = select_source(idx, &chain);
        if sel == OperandSelect::REGISTER_FILE {
            let any_writer = chain
                .iter()
                .any(|(_, lanes)| lanes.iter().any(|p| p.writes(idx)));
            prop_assert!(idx == 0 || !any_writer);
        } else {
            let pos = chain.iter().position(|(src, _)| *src == sel.source).unwrap();
            let lanes = chain[pos].1;
            prop_assert!(lanes[sel.lane].writes(idx));
            prop_assert!(!lanes[sel.lane + 1..].iter().any(|p| p.writes(idx)));
            for (_, younger) in &chain[..pos] {
                prop_assert!(!younger.iter().any(|p| p.writes(idx)));
            }
        }
    }

    #[test]
    fn evaluation_is_pure(snap in ecall_free_snapshot()) {
        for shape in [PipelineShape::five_stage(Xlen::X32), no_forwarding()] {
            let unit = HazardUnit::new(&shape).unwrap();
            prop_assert_eq!(unit.evaluate(&snap), unit.evaluate(&snap));
        }
        let fwd = ForwardingUnit::new(&PipelineShape::five_stage(Xlen::X32)).unwrap();
        prop_assert_eq!(fwd.evaluate(&snap), fwd.evaluate(&snap));
    }

    #[test]
    fn every_decode_lane_gets_a_selector(snap in ecall_free_snapshot()) {
        let unit = ForwardingUnit::new(&PipelineShape::five_stage(Xlen::X32)).unwrap();
        prop_assert_eq!(unit.evaluate(&snap).lanes.len(), snap.decode.len());
    }

    #[test]
    fn clear_dominates_enable(held in any::<u32>(), input in any::<u32>(), enable in any::<bool>()) {
        let mut reg = PipelineRegister::<u32>::new();
        reg.drive(held);
        reg.advance(false, true);
        reg.drive(input);
        reg.advance(true, enable);
        prop_assert_eq!(*reg.get(), 0);
    }
}
