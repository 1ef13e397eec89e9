//! Pipeline latch and system-call interfaces.
//!
//! This module defines the traits at the seams of the pipeline. It provides:
//! 1. **Pipeline Latch Interface:** Flushing and occupancy checks on stage latches.
//! 2. **System-Call Interface:** The collaborator that services `ecall`.

use crate::common::reg::RegisterFile;

/// Represents a pipeline latch (inter-stage buffer).
pub trait PipelineLatch {
    /// Clears all entries in the latch.
    fn flush(&mut self);

    /// Checks if the latch is empty.
    ///
    /// # Returns
    ///
    /// `true` if there are no valid instructions in the latch, `false` otherwise.
    fn is_empty(&self) -> bool;

    /// Number of occupied lanes.
    fn len(&self) -> usize;
}

/// What the pipeline does after a system call has been serviced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyscallAction {
    /// Resume with the instruction after the `ecall`.
    Continue,
    /// Stop the simulation with an exit code.
    Exit(u64),
}

/// Services `ecall` instructions.
///
/// The handler runs at the tick in which the call leaves the execute stage.
/// Every older instruction has committed its register write by then, so the
/// register file it sees is architecturally exact.
pub trait SystemCallHandler {
    /// Handles one system call.
    ///
    /// # Arguments
    ///
    /// * `regs` - The committed register file.
    fn system_call(&mut self, regs: &dyn RegisterFile) -> SyscallAction;
}
