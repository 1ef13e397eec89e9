//! Execution units.
//!
//! Reference implementations of the functional units the pipeline drives: the
//! integer ALU, the branch resolution unit, and the data memory behind the
//! load/store path.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Branch Resolution Unit.
pub mod bru;

/// Load/Store Unit and data memory.
pub mod lsu;
