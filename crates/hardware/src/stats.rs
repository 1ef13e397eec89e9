//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for a pipeline run. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics (CPI).
//! 2. **Hazards:** Data-hazard and system-call stall cycles.
//! 3. **Control:** Taken branches, squashes, and delayed redirects.
//! 4. **Forwarding:** Bypasses taken, broken down by producing stage.

use std::time::Instant;

use crate::core::pipeline::signals::ForwardingSource;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions that left write-back (or the single stage).
    pub instructions_retired: u64,

    /// Cycles in which the operand stage waited on a producer.
    pub stalls_data: u64,
    /// Cycles in which an `ecall` was held in execute.
    pub stalls_system_call: u64,

    /// Taken branches and jumps.
    pub branches_taken: u64,
    /// Cycles in which a taken branch squashed its shadow.
    pub flushes_branch: u64,
    /// Cycles in which a released system call squashed younger instructions.
    pub flushes_system_call: u64,
    /// Instructions discarded by any squash.
    pub squashed: u64,
    /// Taken branches redirected after their delay slots.
    pub delay_slot_redirects: u64,

    /// System calls serviced.
    pub system_calls: u64,

    /// Operands bypassed from execute.
    pub forwards_execute: u64,
    /// Operands bypassed from memory.
    pub forwards_memory: u64,
    /// Operands bypassed from write-back.
    pub forwards_writeback: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            stalls_data: 0,
            stalls_system_call: 0,
            branches_taken: 0,
            flushes_branch: 0,
            flushes_system_call: 0,
            squashed: 0,
            delay_slot_redirects: 0,
            system_calls: 0,
            forwards_execute: 0,
            forwards_memory: 0,
            forwards_writeback: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "hazards", "control", "forwarding"];

impl SimStats {
    /// Counts one bypass from `source`.
    pub const fn record_forward(&mut self, source: ForwardingSource) {
        match source {
            ForwardingSource::DecodeStage => {}
            ForwardingSource::ExecuteStage => self.forwards_execute += 1,
            ForwardingSource::MemoryStage => self.forwards_memory += 1,
            ForwardingSource::WritebackStage => self.forwards_writeback += 1,
        }
    }

    /// Total bypasses taken.
    pub const fn forwards(&self) -> u64 {
        self.forwards_execute + self.forwards_memory + self.forwards_writeback
    }

    /// Instructions per cycle; 0 before the first cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64| (n as f64 / cyc) * 100.0;

        if want("summary") {
            println!("\n==========================================================");
            println!("PIPELINE SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_insts                {}", self.instructions_retired);
            println!("sim_ipc                  {:.4}", self.ipc());
            println!("sim_cpi                  {:.4}", cyc / instr);
            println!("----------------------------------------------------------");
        }
        if want("hazards") {
            println!("HAZARDS");
            println!(
                "  stalls.data            {} ({:.2}%)",
                self.stalls_data,
                pct(self.stalls_data)
            );
            println!(
                "  stalls.syscall         {} ({:.2}%)",
                self.stalls_system_call,
                pct(self.stalls_system_call)
            );
            println!("  syscalls               {}", self.system_calls);
            println!("----------------------------------------------------------");
        }
        if want("control") {
            println!("CONTROL");
            println!("  branches.taken         {}", self.branches_taken);
            println!("  flush.branch           {}", self.flushes_branch);
            println!("  flush.syscall          {}", self.flushes_system_call);
            println!("  squashed               {}", self.squashed);
            println!("  redirect.delayed       {}", self.delay_slot_redirects);
            println!("----------------------------------------------------------");
        }
        if want("forwarding") {
            let total = self.forwards();
            let share = |n: u64| {
                if total == 0 {
                    0.0
                } else {
                    (n as f64 / total as f64) * 100.0
                }
            };
            println!("FORWARDING");
            println!(
                "  fwd.ex                 {} ({:.2}%)",
                self.forwards_execute,
                share(self.forwards_execute)
            );
            println!(
                "  fwd.mem                {} ({:.2}%)",
                self.forwards_memory,
                share(self.forwards_memory)
            );
            println!(
                "  fwd.wb                 {} ({:.2}%)",
                self.forwards_writeback,
                share(self.forwards_writeback)
            );
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
