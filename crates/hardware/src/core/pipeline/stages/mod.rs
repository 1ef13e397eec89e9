//! Pipeline stage implementations.
//!
//! Each stage is a function from the latch contents at the start of a cycle to
//! the values it drives into the next latch. None of them mutate pipeline state;
//! the orchestrator applies their outputs at the tick.
//! 1. **Fetch:** Chooses addresses and bundles instructions.
//! 2. **Decode:** Reads and bypasses operands; resolves early branches.
//! 3. **Execute:** Computes results and branch outcomes.
//! 4. **Memory:** Performs loads and collects stores.
//! 5. **Writeback:** Collects register writes.

/// Operand read stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

/// Operand read stage entry point.
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry point (IF stage).
pub use fetch::fetch_stage;
/// Memory stage entry point (MEM stage).
pub use memory::mem_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::wb_stage;
