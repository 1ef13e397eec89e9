//! Cycle-accurate pipelined processor simulator library.
//!
//! This crate models the hazard-and-forwarding logic of classic in-order RISC-V
//! pipelines with the following:
//! 1. **Core:** Stage latches, the hazard unit, the forwarding unit, and the
//!    orchestrator that clocks them (single-stage, five-stage with optional
//!    delay slots, six-stage dual issue).
//! 2. **ISA:** A structured RV32I/RV64I integer subset with a disassembler.
//! 3. **Catalog:** The fixed set of processors and their pipeline shapes.
//! 4. **Simulation:** Program loading, system calls, configuration, and statistics.
//!
//! # Examples
//!
//! ```
//! use pipesim_core::core::pipeline::{Pipeline, PipelineShape, Status};
//! use pipesim_core::core::pipeline::shape::Xlen;
//! use pipesim_core::isa::Instruction;
//! use pipesim_core::sim::loader::Program;
//!
//! let program = Program::new(
//!     0,
//!     vec![
//!         Instruction::addi(1, 0, 5),
//!         Instruction::add(2, 1, 1),
//!     ],
//! )
//! .unwrap();
//! let mut cpu = Pipeline::new(PipelineShape::five_stage(Xlen::X32), program).unwrap();
//! assert_eq!(cpu.run(100), Status::Drained);
//! assert_eq!(cpu.registers().snapshot()[2], 10);
//! ```

/// Catalog of processors (ids, tags, shapes).
pub mod catalog;
/// Common types (errors, register file interface).
pub mod common;
/// Simulator configuration (defaults and JSON structures).
pub mod config;
/// Processor core (pipeline, units, architectural state).
pub mod core;
/// Instruction set (instruction, ABI names, disassembly).
pub mod isa;
/// Program loading, system calls, and the simulator facade.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The clocked pipeline; construct with `Pipeline::new`.
pub use crate::core::pipeline::{Pipeline, PipelineShape, Status};
/// Simulator facade tying a configuration to a pipeline.
pub use crate::sim::Simulator;
