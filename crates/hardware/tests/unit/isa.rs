//! Instruction Helper and Disassembly Tests.

use pipesim_core::common::error::ConfigError;
use pipesim_core::isa::abi;
use pipesim_core::isa::instruction::{Instruction, Opcode};
use rstest::rstest;

#[rstest]
#[case(Instruction::add(3, 1, 2), "add gp, ra, sp")]
#[case(Instruction::addi(10, 0, -1), "addi a0, zero, -1")]
#[case(Instruction::lw(5, 2, 8), "lw t0, 8(sp)")]
#[case(Instruction::sw(5, 2, -4), "sw t0, -4(sp)")]
#[case(Instruction::beq(1, 0, 12), "beq ra, zero, 12")]
#[case(Instruction::jal(1, -8), "jal ra, -8")]
#[case(Instruction::ecall(), "ecall")]
fn disassembly(#[case] inst: Instruction, #[case] text: &str) {
    assert_eq!(inst.to_string(), text);
}

#[test]
fn unused_ports_report_zero() {
    let store = Instruction::sw(5, 2, 0);
    assert_eq!((store.src1(), store.src2(), store.dest()), (2, 5, 0));
    let imm = Instruction {
        rs2: 9,
        ..Instruction::addi(4, 1, 1)
    };
    assert_eq!(imm.src2(), 0);
    let call = Instruction {
        rd: 7,
        ..Instruction::ecall()
    };
    assert_eq!(call.dest(), 0);
}

#[test]
fn opcode_classes() {
    assert!(Opcode::Lw.is_load() && Opcode::Lw.is_memory());
    assert!(Opcode::Sw.is_store() && !Opcode::Sw.writes_rd());
    assert!(Opcode::Jalr.is_branch_or_jump() && Opcode::Jalr.writes_rd());
    assert!(Opcode::Ecall.is_system_call());
    assert!(!Opcode::Nop.writes_rd());
}

#[test]
fn validate_rejects_register_32() {
    assert_eq!(
        Instruction::add(32, 1, 2).validate(4),
        Err(ConfigError::RegisterOutOfRange {
            index: 32,
            position: 4
        })
    );
    assert!(Instruction::add(31, 31, 31).validate(0).is_ok());
}

#[test]
fn abi_names() {
    assert_eq!(abi::xreg(abi::REG_ZERO), "zero");
    assert_eq!(abi::xreg(abi::REG_A7), "a7");
    assert_eq!(abi::xreg(31), "t6");
    assert_eq!(abi::xreg(40), "x??");
}

#[test]
fn instruction_parses_from_json() {
    let inst: Instruction =
        serde_json::from_str(r#"{ "op": "addi", "rd": 1, "rs1": 0, "imm": 5 }"#).unwrap();
    assert_eq!(inst, Instruction::addi(1, 0, 5));
}
