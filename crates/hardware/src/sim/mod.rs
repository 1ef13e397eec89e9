//! Simulation utilities.
//!
//! Provides program loading, system-call servicing, and the simulator facade
//! that ties a configuration to a pipeline.

/// Program representation and JSON loading.
pub mod loader;

/// The simulator facade.
pub mod simulator;

/// System-call handler used by default.
pub mod syscall;

pub use simulator::Simulator;
