//! Core processor implementation.
//!
//! This module contains the register file, the execution units, and the
//! pipeline that coordinates them.

/// Architectural state.
pub mod arch;

/// Pipelined datapaths (shape, latches, hazard and forwarding units, stages).
pub mod pipeline;

/// Execution units (ALU, branch unit, data memory).
pub mod units;

pub use self::pipeline::{Pipeline, Status};
