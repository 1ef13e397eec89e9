//! Configuration and simulation error types.
//!
//! The per-cycle evaluation never fails; every failure the simulator can report is
//! detected before the first tick. This module defines:
//! 1. **Configuration Errors:** Pipeline shapes the engine does not define, and
//!    programs that violate the architectural register range.
//! 2. **Simulation Errors:** The top-level error returned by the simulator facade,
//!    wrapping configuration and I/O failures.

use thiserror::Error;

use crate::core::pipeline::shape::{BranchResolution, BranchStrategy, DatapathType};

/// Errors raised while building a pipeline, a program, or a configuration.
///
/// All variants are construction-time failures; a pipeline that was built
/// successfully cannot produce one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A single-stage datapath has no stage boundaries to forward across or stall.
    #[error("single-stage datapath cannot host forwarding or hazard-detection units")]
    UnitsOnSingleStage,

    /// The datapath does not define the requested wiring.
    #[error("{datapath:?} datapath does not support {feature}")]
    UnsupportedWiring {
        /// Datapath the wiring was requested for.
        datapath: DatapathType,
        /// Human-readable name of the unsupported feature.
        feature: &'static str,
    },

    /// The branch strategy, delay-slot count and resolution stage disagree.
    #[error(
        "{strategy:?} with {slots} delay slot(s) is inconsistent with branch resolution in {resolution:?}"
    )]
    DelaySlotMismatch {
        /// Requested branch strategy.
        strategy: BranchStrategy,
        /// Requested delay-slot count.
        slots: u8,
        /// Stage in which branches resolve.
        resolution: BranchResolution,
    },

    /// An instruction names a register outside `x0`..`x31`.
    #[error("register index x{index} out of range in instruction {position}")]
    RegisterOutOfRange {
        /// Offending register index.
        index: u8,
        /// Position of the instruction in the program.
        position: usize,
    },

    /// Program base address is not word aligned.
    #[error("program base {0:#x} is not 4-byte aligned")]
    MisalignedBase(u64),

    /// The program does not fit below the top of the address space.
    #[error("{len} instructions at {base:#x} run past the end of the address space")]
    ProgramOverflow {
        /// Program base address.
        base: u64,
        /// Number of instructions.
        len: usize,
    },

    /// A processor name did not match any catalog entry.
    #[error("unknown processor '{0}'")]
    UnknownProcessor(String),

    /// A JSON document could not be parsed.
    #[error("invalid JSON: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Top-level error returned by the simulator facade.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid configuration, shape, or program.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure reading a configuration or program file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
