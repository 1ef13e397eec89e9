//! Register file access capability.
//!
//! The pipeline core never owns register storage directly through a concrete type
//! in its interfaces; collaborators such as system-call handlers see the
//! architectural state through this narrow trait.

/// Number of architectural integer registers.
pub const NUM_REGS: usize = 32;

/// Read/write access to the integer register file.
pub trait RegisterFile {
    /// Reads a register. Index 0 always reads as zero.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not below [`NUM_REGS`].
    fn read(&self, idx: u8) -> u64;

    /// Writes a register. Writes to index 0 are discarded.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    /// * `val` - The value to write.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not below [`NUM_REGS`].
    fn write(&mut self, idx: u8, val: u64);
}
