//! Execute (EX) Stage.
//!
//! This module implements the stage that produces results. It performs the following:
//! 1. **Arithmetic Execution:** ALU operations, upper immediates, and link addresses.
//! 2. **Address Generation:** Effective addresses for loads and stores.
//! 3. **Branch Resolution:** Outcomes of branches and jumps from latched operands.

use crate::core::pipeline::latches::InFlight;
use crate::core::pipeline::shape::Xlen;
use crate::core::units::alu::{Alu, AluOp};
use crate::core::units::bru::{BranchOutcome, BranchUnit};
use crate::isa::instruction::Opcode;
use crate::sim::loader::INST_BYTES;

/// Computes the execute-stage result of one instruction.
///
/// # Returns
///
/// The ALU value, the effective address for memory operations, the link address
/// for jumps, and 0 for instructions without a result.
pub fn compute(entry: &InFlight, xlen: Xlen) -> u64 {
    let inst = &entry.inst;
    let imm = inst.imm as u64;
    match inst.op {
        Opcode::Nop | Opcode::Ecall => 0,
        Opcode::Lui => xlen.normalize(imm << 12),
        Opcode::Auipc => xlen.normalize(entry.pc.wrapping_add(imm << 12)),
        Opcode::Lw | Opcode::Sw => xlen.normalize(entry.rv1.wrapping_add(imm)),
        Opcode::Jal | Opcode::Jalr => xlen.normalize(entry.pc.wrapping_add(INST_BYTES)),
        Opcode::Beq | Opcode::Bne | Opcode::Blt | Opcode::Bge | Opcode::Bltu | Opcode::Bgeu => 0,
        Opcode::Add
        | Opcode::Sub
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Sll
        | Opcode::Srl
        | Opcode::Sra
        | Opcode::Slt
        | Opcode::Sltu => AluOp::for_opcode(inst.op)
            .map_or(0, |op| Alu::execute(op, entry.rv1, entry.rv2, xlen)),
        Opcode::Addi
        | Opcode::Andi
        | Opcode::Ori
        | Opcode::Xori
        | Opcode::Slli
        | Opcode::Srli
        | Opcode::Srai
        | Opcode::Slti
        | Opcode::Sltiu => AluOp::for_opcode(inst.op)
            .map_or(0, |op| Alu::execute(op, entry.rv1, xlen.normalize(imm), xlen)),
    }
}

/// Executes the execute stage.
///
/// # Returns
///
/// The entries with `result` filled in, and the outcome of the oldest control
/// transfer in the stage.
pub fn execute_stage(entries: &[InFlight], xlen: Xlen) -> (Vec<InFlight>, Option<BranchOutcome>) {
    let out: Vec<InFlight> = entries
        .iter()
        .map(|entry| InFlight {
            result: compute(entry, xlen),
            ..entry.clone()
        })
        .collect();
    let outcome = entries
        .iter()
        .find_map(|e| BranchUnit::resolve(&e.inst, e.pc, e.rv1, e.rv2, xlen));
    (out, outcome)
}
