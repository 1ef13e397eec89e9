//! Simulator: a configured pipeline plus its run loop.
//!
//! The simulator resolves a [`Config`] into a pipeline shape, builds the pipeline
//! around a program, and runs it within the configured cycle budget.

use tracing::{info, warn};

use crate::common::error::SimError;
use crate::common::reg::RegisterFile;
use crate::config::Config;
use crate::core::pipeline::engine::{Pipeline, Status};
use crate::isa::abi::REG_SP;
use crate::sim::loader::Program;
use crate::sim::syscall::DefaultHandler;

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    /// The pipeline being simulated.
    pub pipeline: Pipeline<DefaultHandler>,
    max_cycles: u64,
}

impl Simulator {
    /// Creates a simulator for `program` as configured by `config`.
    ///
    /// Console output of the program is echoed to stdout.
    pub fn new(config: &Config, program: Program) -> Result<Self, SimError> {
        let shape = config.shape()?;
        let mut pipeline = Pipeline::with_handler(shape, program, DefaultHandler::echoing())?;
        pipeline.set_trace(config.general.trace);
        if let Some(sp) = config.general.initial_sp {
            pipeline.registers_mut().write(REG_SP, sp);
        }
        Ok(Self {
            pipeline,
            max_cycles: config.general.max_cycles,
        })
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) -> Status {
        self.pipeline.tick()
    }

    /// Runs until the program exits, drains, or the cycle budget runs out.
    pub fn run(&mut self) -> Status {
        info!(
            datapath = ?self.pipeline.shape().datapath,
            max_cycles = self.max_cycles,
            "simulation started"
        );
        let status = self.pipeline.run(self.max_cycles);
        if status == Status::Running {
            warn!(cycles = self.pipeline.cycle(), "cycle budget exhausted");
        }
        status
    }

    /// Retrieves the exit code if the program has exited.
    pub const fn exit_code(&self) -> Option<u64> {
        match self.pipeline.status() {
            Status::Exited(code) => Some(code),
            Status::Running | Status::Drained => None,
        }
    }
}
