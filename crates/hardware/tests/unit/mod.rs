//! # Unit Components
//!
//! Tests grouped by the part of the simulator they exercise: the pipeline core,
//! the processor catalog, configuration, the ISA helpers, and program loading.




/// Instruction helpers and disassembly.
pub mod isa;


/// Statistics counters.
pub mod stats;
