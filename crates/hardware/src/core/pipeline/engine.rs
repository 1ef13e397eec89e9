//! Pipeline Orchestrator.
//!
//! This module wires the stage latches, the hazard unit, and the forwarding unit
//! into one clocked network. It performs:
//! 1. **Construction:** Validates a [`PipelineShape`] and a program, builds one
//!    register per stage boundary, and instantiates only the units the shape asks for.
//! 2. **Evaluation:** Computes every stage output, hazard signal, and forwarding
//!    selector for a cycle from the latch values at the start of that cycle.
//! 3. **Commit:** Applies latch updates, register writes, stores, system calls,
//!    and the fetch redirect together, once, at the end of [`Pipeline::tick`].

use std::collections::VecDeque;
use std::fmt::Write;

use tracing::{debug, info, trace};

use crate::common::error::ConfigError;
use crate::common::reg::RegisterFile;
use crate::core::arch::gpr::Gpr;
use crate::core::pipeline::control::{self, ControlDecision};
use crate::core::pipeline::forwarding::ForwardingUnit;
use crate::core::pipeline::hazards::HazardUnit;
use crate::core::pipeline::latches::{InFlight, LatchControl, StageLatch, StageRegister};
use crate::core::pipeline::shape::{BranchResolution, PipelineShape, Probe};
use crate::core::pipeline::signals::{
    ForwardingEvent, ForwardingSelectors, ForwardingSource, HazardSignals, PipelineSnapshot,
    StageSnapshot,
};
use crate::core::pipeline::stages::decode::{self, Bypass};
use crate::core::pipeline::stages::{
    execute, execute_stage, fetch::FrontEnd, fetch_stage, mem_stage, wb_stage,
};
use crate::core::pipeline::traits::{PipelineLatch, SyscallAction, SystemCallHandler};
use crate::core::units::bru::{BranchOutcome, BranchUnit};
use crate::core::units::lsu::DataMemory;
use crate::sim::loader::{INST_BYTES, Program};
use crate::sim::syscall::DefaultHandler;
use crate::stats::SimStats;

/// Run state of a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// More cycles can be simulated.
    Running,
    /// A system call requested exit with the given code.
    Exited(u64),
    /// Fetch left the program and every stage is empty.
    Drained,
}

/// What the front end does at the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Squash {
    /// Nothing younger is discarded.
    None,
    /// A taken branch discards its shadow through stage `upto`.
    Branch { upto: usize, target: u64 },
    /// A released system call discards everything through stage `upto`.
    SystemCall { upto: usize },
}

/// A cycle-accurate pipelined processor.
///
/// The pipeline owns every piece of mutable state. The hazard and forwarding
/// units are pure and are re-evaluated from scratch each cycle; their latest
/// outputs are kept only so that callers can observe them.
#[derive(Debug)]
pub struct Pipeline<H: SystemCallHandler = DefaultHandler> {
    shape: PipelineShape,
    program: Program,
    front: FrontEnd,
    /// `regs[i]` feeds stage `i + 1`.
    regs: Vec<StageRegister>,
    hazard_unit: Option<HazardUnit>,
    forwarding_unit: Option<ForwardingUnit>,
    gpr: Gpr,
    memory: DataMemory,
    handler: H,
    hazards: HazardSignals,
    selectors: ForwardingSelectors,
    forwarding_log: Vec<ForwardingEvent>,
    stats: SimStats,
    cycle: u64,
    seq: u64,
    status: Status,
    trace: bool,
}

impl Pipeline<DefaultHandler> {
    /// Builds a pipeline with the default system-call handler.
    ///
    /// # Arguments
    ///
    /// * `shape`   - Pipeline shape; copied into the pipeline.
    /// * `program` - Program to run, fetched from its base address.
    ///
    /// # Returns
    ///
    /// The pipeline, or a [`ConfigError`] if the shape is not buildable.
    pub fn new(shape: PipelineShape, program: Program) -> Result<Self, ConfigError> {
        Self::with_handler(shape, program, DefaultHandler::default())
    }
}

impl<H: SystemCallHandler> Pipeline<H> {
    /// Builds a pipeline with a custom system-call handler.
    pub fn with_handler(
        shape: PipelineShape,
        program: Program,
        handler: H,
    ) -> Result<Self, ConfigError> {
        shape.validate()?;
        let memory_flag = shape.probes().contains(Probe::RegisteredBranchFlag);
        let regs = (1..shape.depth())
            .map(|stage| StageRegister::new(memory_flag && stage == shape.memory_stage()))
            .collect();
        let front = FrontEnd::at(program.base());
        debug!(
            datapath = ?shape.datapath,
            strategy = ?shape.branch_strategy,
            slots = shape.branch_delay_slots,
            forwarding = shape.forwarding,
            hazard_detection = shape.hazard_detection,
            "pipeline built"
        );
        Ok(Self {
            shape,
            program,
            front,
            regs,
            hazard_unit: HazardUnit::new(&shape),
            forwarding_unit: ForwardingUnit::new(&shape),
            gpr: Gpr::new(),
            memory: DataMemory::new(),
            handler,
            hazards: HazardSignals::default(),
            selectors: ForwardingSelectors::default(),
            forwarding_log: Vec::new(),
            stats: SimStats::default(),
            cycle: 0,
            seq: 0,
            status: Status::Running,
            trace: false,
        })
    }

    /// Enables per-cycle trace events.
    pub const fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Shape the pipeline was built with.
    pub const fn shape(&self) -> &PipelineShape {
        &self.shape
    }

    /// Hazard signals of the last simulated cycle.
    pub const fn hazards(&self) -> &HazardSignals {
        &self.hazards
    }

    /// Forwarding selectors of the last simulated cycle.
    pub const fn selectors(&self) -> &ForwardingSelectors {
        &self.selectors
    }

    /// Number of cycles simulated so far.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Current run state.
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Next sequential fetch address.
    pub const fn pc(&self) -> u64 {
        self.front.pc
    }

    /// Performance counters.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Every bypass taken so far, in cycle order.
    pub fn forwarding_log(&self) -> &[ForwardingEvent] {
        &self.forwarding_log
    }

    /// Committed register file.
    pub const fn registers(&self) -> &Gpr {
        &self.gpr
    }

    /// Mutable register file, for initial state.
    pub const fn registers_mut(&mut self) -> &mut Gpr {
        &mut self.gpr
    }

    /// Committed data memory.
    pub const fn memory(&self) -> &DataMemory {
        &self.memory
    }

    /// Mutable data memory, for initial state.
    pub const fn memory_mut(&mut self) -> &mut DataMemory {
        &mut self.memory
    }

    /// System-call handler.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Instructions currently held in the latch feeding `stage`.
    ///
    /// Stage 0 (fetch) and out-of-range stages have no input latch.
    pub fn stage(&self, stage: usize) -> &[InFlight] {
        stage
            .checked_sub(1)
            .and_then(|i| self.regs.get(i))
            .map_or(&[], StageRegister::entries)
    }

    /// Snapshot the hazard and forwarding units will see on the next cycle.
    pub fn snapshot(&self) -> PipelineSnapshot {
        if !self.shape.is_pipelined() {
            return PipelineSnapshot::default();
        }
        let view = |stage: usize| -> Vec<StageSnapshot> {
            stage
                .checked_sub(1)
                .and_then(|i| self.regs.get(i))
                .map(|r| r.latch.get().snapshots())
                .unwrap_or_default()
        };
        PipelineSnapshot {
            decode: view(self.shape.operand_stage()),
            execute: view(self.shape.execute_stage()),
            memory: view(self.shape.memory_stage()),
            writeback: view(self.shape.writeback_stage()),
        }
    }

    /// Occupancy of every latched stage, e.g. `ID:0x8 EX:0x4 MEM:- WB:0x0`.
    ///
    /// Dual-issue bundles list both lanes, oldest first (`EX:0x8/0xc`).
    pub fn occupancy(&self) -> String {
        let mut out = String::new();
        for (stage, kind) in self.shape.stages().iter().enumerate().skip(1) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(kind.name());
            out.push(':');
            let entries = self.stage(stage);
            if entries.is_empty() {
                out.push('-');
            }
            for (lane, entry) in entries.iter().enumerate() {
                if lane > 0 {
                    out.push('/');
                }
                let _ = write!(out, "{:#x}", entry.pc);
            }
        }
        out
    }

    /// Runs until the program exits, drains, or `max_cycles` more cycles elapse.
    pub fn run(&mut self, max_cycles: u64) -> Status {
        for _ in 0..max_cycles {
            if self.tick() != Status::Running {
                break;
            }
        }
        self.status
    }

    /// Advances exactly one clock cycle.
    pub fn tick(&mut self) -> Status {
        if self.status != Status::Running {
            return self.status;
        }
        self.cycle += 1;
        self.stats.cycles += 1;
        self.status = if self.shape.is_pipelined() {
            self.tick_pipelined()
        } else {
            self.tick_single()
        };
        if let Status::Exited(code) = self.status {
            info!(cycle = self.cycle, code, "program exited");
        }
        self.status
    }

    /// One cycle of the single-stage datapath: no latches, no units.
    fn tick_single(&mut self) -> Status {
        let xlen = self.shape.xlen;
        let pc = self.front.pc;
        let Some(inst) = self.program.fetch(pc) else {
            return Status::Drained;
        };
        self.seq += 1;
        let mut entry = InFlight {
            seq: self.seq,
            pc,
            inst,
            rv1: self.gpr.read(inst.src1()),
            rv2: self.gpr.read(inst.src2()),
            result: 0,
        };
        entry.result = execute::compute(&entry, xlen);
        let outcome = BranchUnit::resolve(&inst, pc, entry.rv1, entry.rv2, xlen);
        if inst.op.is_load() {
            entry.result = self.memory.load_word(entry.result, xlen);
        } else if inst.op.is_store() {
            self.memory.store_word(entry.result, entry.rv2);
        }
        self.gpr.write(inst.dest(), entry.result);
        self.stats.instructions_retired += 1;
        self.front.pc = match outcome {
            Some(o) if o.taken => {
                self.stats.branches_taken += 1;
                o.target
            }
            _ => pc.wrapping_add(INST_BYTES),
        };
        if self.trace || cfg!(feature = "always-trace") {
            trace!(cycle = self.cycle, pc, inst = %inst, "SS");
        }
        if inst.op.is_system_call() {
            if let Some(code) = self.service_system_call() {
                return Status::Exited(code);
            }
        }
        Status::Running
    }

    /// One cycle of a pipelined datapath.
    fn tick_pipelined(&mut self) -> Status {
        let shape = self.shape;
        let xlen = shape.xlen;
        let (o, e, m, w) = (
            shape.operand_stage(),
            shape.execute_stage(),
            shape.memory_stage(),
            shape.writeback_stage(),
        );

        // ── Combinational phase: nothing below mutates pipeline state. ──
        let wb_entries = self.stage(w).to_vec();
        let writes = wb_stage(&wb_entries);
        let mem_out = mem_stage(self.stage(m), &self.memory, xlen);
        let (ex_out, ex_outcome) = execute_stage(self.stage(e), xlen);

        let snapshot = self.snapshot();
        let mut hazards = self
            .hazard_unit
            .map(|unit| unit.evaluate(&snapshot))
            .unwrap_or_default();
        let selectors = self.forwarding_unit.map_or_else(
            || ForwardingSelectors::register_file(snapshot.decode.len()),
            |unit| unit.evaluate(&snapshot),
        );

        let bypass = Bypass {
            execute: &ex_out,
            memory: &mem_out.entries,
            writeback: &wb_entries,
        };
        let id_out = decode::decode_stage(self.stage(o), &self.gpr, &selectors, &bypass);

        // Without a hazard unit an ecall is serviced as it passes through execute.
        let ecall_in_ex = self.stage(e).iter().any(|i| i.inst.op.is_system_call());
        let release = if self.hazard_unit.is_some() {
            hazards.flush_system_call
        } else {
            ecall_in_ex
        };

        let fetch = (!hazards.stall_fetch).then(|| fetch_stage(&self.front, &self.program, shape.width()));
        let fetched = fetch.as_ref().map_or(0, |f| f.bundle.len());

        // Branch outcome of the resolving stage, oldest stage first.
        let resolved: Option<BranchOutcome> = match shape.branch_resolution {
            BranchResolution::Memory => self.regs[m - 1].branch_outcome(),
            BranchResolution::Execute => ex_outcome,
            BranchResolution::Decode if !hazards.stall_fetch && !release => {
                decode::resolve_early_branch(self.stage(o), &self.gpr, &selectors, &bypass, xlen)
            }
            BranchResolution::Decode => None,
        };
        // A released ecall rewinds the front end, so its shadow excludes this fetch.
        let system_call_squash = release && self.hazard_unit.is_some();
        let r = shape.resolution_stage();
        let front_shadow = match fetch.as_ref() {
            Some(f) if !system_call_squash => fetched + f.next.refetch.len(),
            _ => self.front.refetch.len(),
        };
        let shadow = (1..r).map(|s| self.stage(s).len()).sum::<usize>() + front_shadow;
        let decision = control::decide(
            &shape,
            resolved,
            u8::try_from(shadow).unwrap_or(u8::MAX),
        );

        // An older taken branch in memory squashes the ecall before it can proceed.
        let squash = match decision {
            ControlDecision::Flush { target } => Squash::Branch { upto: r, target },
            _ if system_call_squash => Squash::SystemCall { upto: e },
            _ => Squash::None,
        };
        let run_system_call = release && !matches!(squash, Squash::Branch { .. } if r > e);
        if matches!(squash, Squash::Branch { .. }) {
            hazards.flush_branch = true;
        }
        if !matches!(squash, Squash::SystemCall { .. }) {
            hazards.flush_system_call = false;
        }

        // Latch controls; flushes dominate stalls and holds.
        let controls: Vec<LatchControl> = (1..shape.depth())
            .map(|stage| {
                let mut ctrl = LatchControl::PASS;
                if stage <= o && hazards.stall_fetch {
                    ctrl.enable = false;
                }
                if stage == e {
                    ctrl.enable = !hazards.stall_decode_latch;
                    ctrl.clear = hazards.clear_decode_execute_latch;
                }
                if stage == m && hazards.clear_execute_memory_latch {
                    ctrl.clear = true;
                }
                match squash {
                    Squash::Branch { upto, .. } | Squash::SystemCall { upto } if stage <= upto => {
                        ctrl.clear = true;
                    }
                    _ => {}
                }
                ctrl
            })
            .collect();

        // ── Commit phase. ──
        let squashed_pcs: Vec<u64> = match squash {
            Squash::SystemCall { upto } => (1..upto)
                .rev()
                .flat_map(|s| self.stage(s).iter().map(|i| i.pc))
                .collect(),
            _ => Vec::new(),
        };
        let squashed = match squash {
            Squash::Branch { upto, .. } | Squash::SystemCall { upto } => {
                (1..upto).map(|s| self.stage(s).len()).sum::<usize>() + fetched
            }
            Squash::None => 0,
        };

        let decode_advances = controls[e - 1].enable && !controls[e - 1].clear;
        if decode_advances {
            self.log_forwards(&id_out, &selectors);
        }

        let mut bundle = Vec::new();
        if let Some(f) = fetch.as_ref() {
            for &(pc, inst) in &f.bundle {
                self.seq += 1;
                bundle.push(InFlight {
                    seq: self.seq,
                    pc,
                    inst,
                    ..InFlight::default()
                });
            }
        }
        let mut inputs: Vec<StageLatch> = Vec::with_capacity(shape.depth() - 1);
        for stage in 1..shape.depth() {
            let entries = if stage == 1 {
                std::mem::take(&mut bundle)
            } else if stage == e {
                id_out.clone()
            } else if stage == m {
                ex_out.clone()
            } else if stage == w {
                mem_out.entries.clone()
            } else {
                self.stage(stage - 1).to_vec()
            };
            inputs.push(StageLatch::with(entries));
        }
        for (i, (input, ctrl)) in inputs.into_iter().zip(&controls).enumerate() {
            let outcome = if i + 1 == m { ex_outcome } else { None };
            self.regs[i].drive(input, outcome);
            self.regs[i].advance(*ctrl);
        }

        for write in &writes {
            self.gpr.write(write.reg, write.value);
        }
        for store in &mem_out.stores {
            self.memory.store_word(store.addr, store.value);
        }
        self.stats.instructions_retired += wb_entries.len() as u64;

        match squash {
            Squash::Branch { target, .. } => {
                self.front = FrontEnd::at(target);
            }
            Squash::SystemCall { .. } => {
                let mut refetch: VecDeque<u64> = squashed_pcs.into();
                refetch.extend(self.front.refetch.drain(..));
                self.front.refetch = refetch;
            }
            Squash::None => {
                if let Some(f) = fetch {
                    self.front = f.next;
                }
            }
        }
        match decision {
            ControlDecision::Redirect { target } => {
                self.front.pc = target;
                self.stats.delay_slot_redirects += 1;
            }
            ControlDecision::Delayed(pending) => {
                self.front.pending = Some(pending);
                self.stats.delay_slot_redirects += 1;
            }
            ControlDecision::Continue | ControlDecision::Flush { .. } => {}
        }
        if resolved.is_some_and(|o| o.taken) {
            self.stats.branches_taken += 1;
        }

        self.record_cycle(&hazards, squash, squashed);
        if self.trace || cfg!(feature = "always-trace") {
            trace!(
                cycle = self.cycle,
                pc = self.front.pc,
                stall_fetch = hazards.stall_fetch,
                stall_syscall = hazards.stall_system_call,
                clear_de = hazards.clear_decode_execute_latch,
                clear_em = hazards.clear_execute_memory_latch,
                flush_branch = hazards.flush_branch,
                flush_syscall = hazards.flush_system_call,
                stages = %self.occupancy(),
                "tick"
            );
        }
        self.hazards = hazards;
        self.selectors = selectors;

        if run_system_call {
            if let Some(code) = self.service_system_call() {
                self.stats.instructions_retired += 1;
                return Status::Exited(code);
            }
        }

        if self.is_drained() {
            debug!(cycle = self.cycle, "pipeline drained");
            return Status::Drained;
        }
        Status::Running
    }

    /// Records the bypasses taken by instructions leaving the operand stage.
    fn log_forwards(&mut self, id_out: &[InFlight], selectors: &ForwardingSelectors) {
        for (lane, entry) in id_out.iter().enumerate() {
            let sel = selectors.lane(lane);
            for (reg, source) in [
                (entry.inst.src1(), sel.op1.source),
                (entry.inst.src2(), sel.op2.source),
            ] {
                if reg == 0 || source == ForwardingSource::DecodeStage {
                    continue;
                }
                debug!(cycle = self.cycle, pc = entry.pc, reg, from = source.name(), "forward");
                self.stats.record_forward(source);
                self.forwarding_log.push(ForwardingEvent {
                    cycle: self.cycle,
                    consumer_pc: entry.pc,
                    reg,
                    source,
                });
            }
        }
    }

    /// Updates stall and flush counters for one cycle.
    fn record_cycle(&mut self, hazards: &HazardSignals, squash: Squash, squashed: usize) {
        if hazards.load_use_hazard {
            self.stats.stalls_data += 1;
            debug!(cycle = self.cycle, "data hazard stall");
        }
        if hazards.system_call_hazard {
            self.stats.stalls_system_call += 1;
            debug!(cycle = self.cycle, "system call drain stall");
        }
        match squash {
            Squash::Branch { target, .. } => {
                self.stats.flushes_branch += 1;
                debug!(cycle = self.cycle, target, squashed, "branch flush");
            }
            Squash::SystemCall { .. } => {
                self.stats.flushes_system_call += 1;
                debug!(cycle = self.cycle, squashed, "system call flush");
            }
            Squash::None => {}
        }
        self.stats.squashed += squashed as u64;
    }

    /// Invokes the handler on the committed register file.
    ///
    /// # Returns
    ///
    /// The exit code if the handler asked to stop.
    fn service_system_call(&mut self) -> Option<u64> {
        self.stats.system_calls += 1;
        match self.handler.system_call(&self.gpr) {
            SyscallAction::Continue => None,
            SyscallAction::Exit(code) => Some(code),
        }
    }

    /// Returns `true` once fetch has left the program and nothing is in flight.
    fn is_drained(&self) -> bool {
        self.front.refetch.is_empty()
            && self.front.pending.is_none()
            && !self.program.contains(self.front.pc)
            && self.regs.iter().all(|r| r.latch.get().is_empty())
    }
}
