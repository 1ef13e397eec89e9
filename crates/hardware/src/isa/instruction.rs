//! Pre-decoded instruction records.
//!
//! The simulator models datapath timing, not binary decoding: programs arrive as
//! lists of already-decoded records. This module provides:
//! 1. **Opcodes:** The fixed enumeration of instruction classes the pipeline knows.
//! 2. **Operand Usage:** Which register ports each opcode reads and writes.
//! 3. **Constructors:** Short helpers for building programs in code and tests.

use serde::Deserialize;

use crate::common::error::ConfigError;
use crate::common::reg::NUM_REGS;

/// Operation performed by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opcode {
    /// No operation; also the value of a squashed or empty slot.
    #[default]
    Nop,
    /// `rd = rs1 + rs2`
    Add,
    /// `rd = rs1 - rs2`
    Sub,
    /// `rd = rs1 & rs2`
    And,
    /// `rd = rs1 | rs2`
    Or,
    /// `rd = rs1 ^ rs2`
    Xor,
    /// `rd = rs1 << rs2`
    Sll,
    /// `rd = rs1 >> rs2` (logical)
    Srl,
    /// `rd = rs1 >> rs2` (arithmetic)
    Sra,
    /// `rd = (rs1 < rs2)` signed
    Slt,
    /// `rd = (rs1 < rs2)` unsigned
    Sltu,
    /// `rd = rs1 + imm`
    Addi,
    /// `rd = rs1 & imm`
    Andi,
    /// `rd = rs1 | imm`
    Ori,
    /// `rd = rs1 ^ imm`
    Xori,
    /// `rd = rs1 << imm`
    Slli,
    /// `rd = rs1 >> imm` (logical)
    Srli,
    /// `rd = rs1 >> imm` (arithmetic)
    Srai,
    /// `rd = (rs1 < imm)` signed
    Slti,
    /// `rd = (rs1 < imm)` unsigned
    Sltiu,
    /// `rd = imm << 12`
    Lui,
    /// `rd = pc + (imm << 12)`
    Auipc,
    /// Load word: `rd = sext(mem[rs1 + imm])`
    Lw,
    /// Store word: `mem[rs1 + imm] = rs2`
    Sw,
    /// Branch if equal.
    Beq,
    /// Branch if not equal.
    Bne,
    /// Branch if less than (signed).
    Blt,
    /// Branch if greater or equal (signed).
    Bge,
    /// Branch if less than (unsigned).
    Bltu,
    /// Branch if greater or equal (unsigned).
    Bgeu,
    /// Jump and link: `rd = pc + 4; pc += imm`
    Jal,
    /// Jump and link register: `rd = pc + 4; pc = (rs1 + imm) & !1`
    Jalr,
    /// Environment call (system call).
    Ecall,
}

impl Opcode {
    /// Returns `true` for the conditional branches and both jumps.
    pub const fn is_branch_or_jump(self) -> bool {
        matches!(
            self,
            Self::Jal
                | Self::Jalr
                | Self::Beq
                | Self::Bne
                | Self::Bge
                | Self::Blt
                | Self::Bgeu
                | Self::Bltu
        )
    }

    /// Returns `true` for loads (result available only after the memory stage).
    pub const fn is_load(self) -> bool {
        matches!(self, Self::Lw)
    }

    /// Returns `true` for stores.
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Sw)
    }

    /// Returns `true` for instructions that access data memory.
    pub const fn is_memory(self) -> bool {
        self.is_load() || self.is_store()
    }

    /// Returns `true` for the system-call class.
    pub const fn is_system_call(self) -> bool {
        matches!(self, Self::Ecall)
    }

    /// Returns `true` if the instruction reads its first source register.
    pub const fn reads_rs1(self) -> bool {
        !matches!(
            self,
            Self::Nop | Self::Lui | Self::Auipc | Self::Jal | Self::Ecall
        )
    }

    /// Returns `true` if the instruction reads its second source register.
    pub const fn reads_rs2(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::And
                | Self::Or
                | Self::Xor
                | Self::Sll
                | Self::Srl
                | Self::Sra
                | Self::Slt
                | Self::Sltu
                | Self::Sw
                | Self::Beq
                | Self::Bne
                | Self::Blt
                | Self::Bge
                | Self::Bltu
                | Self::Bgeu
        )
    }

    /// Returns `true` if the instruction writes its destination register.
    pub const fn writes_rd(self) -> bool {
        !matches!(
            self,
            Self::Nop
                | Self::Sw
                | Self::Beq
                | Self::Bne
                | Self::Blt
                | Self::Bge
                | Self::Bltu
                | Self::Bgeu
                | Self::Ecall
        )
    }

    /// Lower-case assembler mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "nop",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Sll => "sll",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
            Self::Addi => "addi",
            Self::Andi => "andi",
            Self::Ori => "ori",
            Self::Xori => "xori",
            Self::Slli => "slli",
            Self::Srli => "srli",
            Self::Srai => "srai",
            Self::Slti => "slti",
            Self::Sltiu => "sltiu",
            Self::Lui => "lui",
            Self::Auipc => "auipc",
            Self::Lw => "lw",
            Self::Sw => "sw",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Blt => "blt",
            Self::Bge => "bge",
            Self::Bltu => "bltu",
            Self::Bgeu => "bgeu",
            Self::Jal => "jal",
            Self::Jalr => "jalr",
            Self::Ecall => "ecall",
        }
    }
}

/// A decoded instruction.
///
/// Register fields an opcode does not use are ignored by the pipeline; the
/// accessors [`Instruction::src1`], [`Instruction::src2`] and [`Instruction::dest`]
/// report them as 0 so that unused ports never look like dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Instruction {
    /// Operation.
    pub op: Opcode,
    /// Destination register index.
    #[serde(default)]
    pub rd: u8,
    /// First source register index.
    #[serde(default)]
    pub rs1: u8,
    /// Second source register index.
    #[serde(default)]
    pub rs2: u8,
    /// Sign-extended immediate (byte offset for branches and jumps).
    #[serde(default)]
    pub imm: i64,
}

impl Instruction {
    /// Register-register operation.
    pub const fn r(op: Opcode, rd: u8, rs1: u8, rs2: u8) -> Self {
        Self {
            op,
            rd,
            rs1,
            rs2,
            imm: 0,
        }
    }

    /// Register-immediate operation (also loads and `jalr`).
    pub const fn i(op: Opcode, rd: u8, rs1: u8, imm: i64) -> Self {
        Self {
            op,
            rd,
            rs1,
            rs2: 0,
            imm,
        }
    }

    /// `add rd, rs1, rs2`
    pub const fn add(rd: u8, rs1: u8, rs2: u8) -> Self {
        Self::r(Opcode::Add, rd, rs1, rs2)
    }

    /// `sub rd, rs1, rs2`
    pub const fn sub(rd: u8, rs1: u8, rs2: u8) -> Self {
        Self::r(Opcode::Sub, rd, rs1, rs2)
    }

    /// `addi rd, rs1, imm`
    pub const fn addi(rd: u8, rs1: u8, imm: i64) -> Self {
        Self::i(Opcode::Addi, rd, rs1, imm)
    }

    /// `lui rd, imm`
    pub const fn lui(rd: u8, imm: i64) -> Self {
        Self::i(Opcode::Lui, rd, 0, imm)
    }

    /// `lw rd, imm(rs1)`
    pub const fn lw(rd: u8, rs1: u8, imm: i64) -> Self {
        Self::i(Opcode::Lw, rd, rs1, imm)
    }

    /// `sw rs2, imm(rs1)`
    pub const fn sw(rs2: u8, rs1: u8, imm: i64) -> Self {
        Self {
            op: Opcode::Sw,
            rd: 0,
            rs1,
            rs2,
            imm,
        }
    }

    /// Conditional branch `op rs1, rs2, offset`.
    pub const fn branch(op: Opcode, rs1: u8, rs2: u8, offset: i64) -> Self {
        Self {
            op,
            rd: 0,
            rs1,
            rs2,
            imm: offset,
        }
    }

    /// `beq rs1, rs2, offset`
    pub const fn beq(rs1: u8, rs2: u8, offset: i64) -> Self {
        Self::branch(Opcode::Beq, rs1, rs2, offset)
    }

    /// `bne rs1, rs2, offset`
    pub const fn bne(rs1: u8, rs2: u8, offset: i64) -> Self {
        Self::branch(Opcode::Bne, rs1, rs2, offset)
    }

    /// `jal rd, offset`
    pub const fn jal(rd: u8, offset: i64) -> Self {
        Self::i(Opcode::Jal, rd, 0, offset)
    }

    /// `jalr rd, imm(rs1)`
    pub const fn jalr(rd: u8, rs1: u8, imm: i64) -> Self {
        Self::i(Opcode::Jalr, rd, rs1, imm)
    }

    /// `ecall`
    pub const fn ecall() -> Self {
        Self::r(Opcode::Ecall, 0, 0, 0)
    }

    /// `nop`
    pub const fn nop() -> Self {
        Self::r(Opcode::Nop, 0, 0, 0)
    }

    /// First source register actually read, or 0.
    pub const fn src1(&self) -> u8 {
        if self.op.reads_rs1() { self.rs1 } else { 0 }
    }

    /// Second source register actually read, or 0.
    pub const fn src2(&self) -> u8 {
        if self.op.reads_rs2() { self.rs2 } else { 0 }
    }

    /// Destination register actually written, or 0.
    pub const fn dest(&self) -> u8 {
        if self.op.writes_rd() { self.rd } else { 0 }
    }

    /// Checks that every register field is an architectural index.
    ///
    /// Unused fields are checked too: an out-of-range index is a malformed record
    /// regardless of whether the opcode reads it.
    ///
    /// # Arguments
    ///
    /// * `position` - Index of the instruction in its program, for the error report.
    pub fn validate(&self, position: usize) -> Result<(), ConfigError> {
        for index in [self.rd, self.rs1, self.rs2] {
            if usize::from(index) >= NUM_REGS {
                return Err(ConfigError::RegisterOutOfRange { index, position });
            }
        }
        Ok(())
    }
}
