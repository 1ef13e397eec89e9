//! Common types shared across the simulator.
//!
//! This module provides:
//! 1. **Error Handling:** Configuration and simulation error enums.
//! 2. **Register Access:** The narrow capability through which collaborators read
//!    and write architectural registers.

/// Error types.
pub mod error;

/// Register file access trait.
pub mod reg;

pub use error::{ConfigError, SimError};
pub use reg::{NUM_REGS, RegisterFile};
