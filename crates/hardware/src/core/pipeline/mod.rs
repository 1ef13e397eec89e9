//! Pipelined datapaths.
//!
//! This module contains the clocked pipeline and the combinational units that
//! keep it correct. It includes the following components:
//! 1. **Shape:** Datapath, branch strategy, and wiring options of a pipeline.
//! 2. **Latches:** Inter-stage registers with clear/enable control.
//! 3. **Hazards:** Load-use and system-call hazard detection.
//! 4. **Forwarding:** Operand bypass selection.
//! 5. **Control:** Branch squash and delayed redirect decisions.
//! 6. **Stages:** Fetch, operand read, execute, memory, and write-back logic.
//! 7. **Engine:** The orchestrator that clocks everything together.

/// Branch squash and delayed redirect decisions.
pub mod control;

/// The pipeline orchestrator.
pub mod engine;

/// Operand forwarding unit.
pub mod forwarding;

/// Hazard detection unit.
pub mod hazards;

/// Inter-stage pipeline registers.
pub mod latches;

/// Pipeline shape and wiring options.
pub mod shape;

/// Per-cycle snapshots, hazard signals, and forwarding selectors.
pub mod signals;

/// Pipeline stage implementations.
pub mod stages;

/// Latch and system-call interfaces.
pub mod traits;

pub use engine::{Pipeline, Status};
pub use shape::PipelineShape;
