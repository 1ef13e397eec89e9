//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the reference integer ALU used by the execute stage.
//! Operands arrive already normalized to the register width; every result is
//! normalized again before it leaves the unit.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub
//! - [`logic`]:      Or, And, Xor, Slt, Sltu
//! - [`shifts`]:     Sll, Srl, Sra

/// Integer addition and subtraction.
pub mod arithmetic;

/// Bitwise logical and comparison operations (or, and, xor, slt).
pub mod logic;

/// Shift operations (sll, srl, sra).
pub mod shifts;

use crate::core::pipeline::shape::Xlen;
use crate::isa::instruction::Opcode;

/// ALU operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Addition; also used for address and link computation.
    #[default]
    Add,
    /// Subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Set less than (signed).
    Slt,
    /// Set less than unsigned.
    Sltu,
}

impl AluOp {
    /// ALU operation performed by an arithmetic opcode.
    ///
    /// # Returns
    ///
    /// `None` for opcodes that do not use the ALU for their result.
    pub const fn for_opcode(op: Opcode) -> Option<Self> {
        Some(match op {
            Opcode::Add | Opcode::Addi => Self::Add,
            Opcode::Sub => Self::Sub,
            Opcode::And | Opcode::Andi => Self::And,
            Opcode::Or | Opcode::Ori => Self::Or,
            Opcode::Xor | Opcode::Xori => Self::Xor,
            Opcode::Sll | Opcode::Slli => Self::Sll,
            Opcode::Srl | Opcode::Srli => Self::Srl,
            Opcode::Sra | Opcode::Srai => Self::Sra,
            Opcode::Slt | Opcode::Slti => Self::Slt,
            Opcode::Sltu | Opcode::Sltiu => Self::Sltu,
            _ => return None,
        })
    }
}

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op`   - The ALU operation to perform
    /// * `a`    - First operand
    /// * `b`    - Second operand (also used as shift amount)
    /// * `xlen` - Register width; 32-bit results are sign-extended
    ///
    /// # Examples
    ///
    /// ```
    /// use pipesim_core::core::units::alu::{Alu, AluOp};
    /// use pipesim_core::core::pipeline::shape::Xlen;
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 42, 8, Xlen::X64), 50);
    /// assert_eq!(Alu::execute(AluOp::Add, 0x7FFF_FFFF, 1, Xlen::X32), 0xFFFF_FFFF_8000_0000);
    /// assert_eq!(Alu::execute(AluOp::Slt, -5_i64 as u64, 10, Xlen::X64), 1);
    /// ```
    pub fn execute(op: AluOp, a: u64, b: u64, xlen: Xlen) -> u64 {
        let raw = match op {
            AluOp::Add | AluOp::Sub => arithmetic::execute(op, a, b),
            AluOp::Or | AluOp::And | AluOp::Xor | AluOp::Slt | AluOp::Sltu => {
                logic::execute(op, a, b)
            }
            AluOp::Sll | AluOp::Srl | AluOp::Sra => shifts::execute(op, a, b, xlen),
        };
        xlen.normalize(raw)
    }
}
