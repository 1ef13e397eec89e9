//! Instruction disassembler.
//!
//! Renders decoded instruction records as assembler text for cycle traces,
//! logging, and test diagnostics.
//!
//! # Usage
//!
//! ```
//! use pipesim_core::isa::instruction::Instruction;
//! assert_eq!(Instruction::addi(10, 0, 10).to_string(), "addi a0, zero, 10");
//! ```

use std::fmt;

use crate::isa::abi::xreg;
use crate::isa::instruction::{Instruction, Opcode};

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.op.mnemonic();
        match self.op {
            Opcode::Nop | Opcode::Ecall => write!(f, "{m}"),
            Opcode::Add
            | Opcode::Sub
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Sll
            | Opcode::Srl
            | Opcode::Sra
            | Opcode::Slt
            | Opcode::Sltu => write!(
                f,
                "{m} {}, {}, {}",
                xreg(self.rd),
                xreg(self.rs1),
                xreg(self.rs2)
            ),
            Opcode::Addi
            | Opcode::Andi
            | Opcode::Ori
            | Opcode::Xori
            | Opcode::Slli
            | Opcode::Srli
            | Opcode::Srai
            | Opcode::Slti
            | Opcode::Sltiu => write!(
                f,
                "{m} {}, {}, {}",
                xreg(self.rd),
                xreg(self.rs1),
                self.imm
            ),
            Opcode::Lui | Opcode::Auipc => write!(f, "{m} {}, {:#x}", xreg(self.rd), self.imm),
            Opcode::Lw | Opcode::Jalr => write!(
                f,
                "{m} {}, {}({})",
                xreg(self.rd),
                self.imm,
                xreg(self.rs1)
            ),
            Opcode::Sw => write!(
                f,
                "{m} {}, {}({})",
                xreg(self.rs2),
                self.imm,
                xreg(self.rs1)
            ),
            Opcode::Beq | Opcode::Bne | Opcode::Blt | Opcode::Bge | Opcode::Bltu | Opcode::Bgeu => {
                write!(
                    f,
                    "{m} {}, {}, {}",
                    xreg(self.rs1),
                    xreg(self.rs2),
                    self.imm
                )
            }
            Opcode::Jal => write!(f, "{m} {}, {}", xreg(self.rd), self.imm),
        }
    }
}
