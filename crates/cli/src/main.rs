//! Pipelined processor simulator CLI.
//!
//! This binary runs JSON programs on catalog processors. It performs:
//! 1. **Listing:** Prints every processor in the catalog with its shape.
//! 2. **Running:** Loads a program and a configuration, runs to completion, and
//!    reports statistics and the final register file.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pipesim_core::catalog::{self, ProcessorId};
use pipesim_core::common::error::SimError;
use pipesim_core::config::Config;
use pipesim_core::core::pipeline::Status;
use pipesim_core::isa::abi;
use pipesim_core::sim::Simulator;
use pipesim_core::sim::loader;

#[derive(Parser, Debug)]
#[command(
    name = "pipesim",
    author,
    version,
    about = "Cycle-accurate pipelined RISC-V simulator",
    long_about = "Run JSON programs on single-stage, five-stage, and dual-issue pipelines.\n\nExamples:\n  pipesim list\n  pipesim run --program demos/forwarding.json --processor RV32_5S\n  RUST_LOG=debug pipesim run -p demos/branches.json --processor RV32_5S_2S_DB"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the processors in the catalog.
    List,

    /// Run a program.
    Run {
        /// JSON program file.
        #[arg(short, long)]
        program: PathBuf,

        /// Catalog processor; overrides the configuration file.
        #[arg(long)]
        processor: Option<ProcessorId>,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cycle budget; overrides the configuration file.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Emit a trace event every cycle.
        #[arg(long)]
        trace: bool,

        /// Print the final state as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::List => {
            cmd_list();
            Ok(0)
        }
        Commands::Run {
            program,
            processor,
            config,
            max_cycles,
            trace,
            json,
        } => cmd_run(&program, processor, config.as_deref(), max_cycles, trace, json),
    };
    match result {
        Ok(code) => process::exit(i32::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    }
}

/// Installs the log subscriber; `RUST_LOG` wins over `--trace`.
fn init_logging(trace: bool) {
    let fallback = if trace { "pipesim_core=trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_list() {
    println!(
        "{:<18} {:<6} {:<13} {:<16} {:>5} {:<8} {:>3} {:>3}",
        "ID", "ISA", "DATAPATH", "BRANCH", "SLOTS", "RESOLVE", "FW", "HZ"
    );
    let flag = |on: bool| if on { "y" } else { "n" };
    for info in catalog::available() {
        let tags = &info.tags;
        let isa = format!("{:?}", info.isa);
        let datapath = format!("{:?}", tags.datapath);
        let strategy = format!("{:?}", tags.branch_strategy);
        let resolution = format!("{:?}", tags.branch_resolution);
        println!(
            "{:<18} {isa:<6} {datapath:<13} {strategy:<16} {:>5} {resolution:<8} {:>3} {:>3}",
            info.id.name(),
            tags.branch_delay_slots,
            flag(tags.forwarding),
            flag(tags.hazard_detection),
        );
        println!("{:<18} {}", "", info.description);
    }
}

/// Runs a program and reports the outcome.
///
/// # Returns
///
/// The process exit code: the program's exit code, or 0 if it drained, or 1 if
/// the cycle budget ran out.
fn cmd_run(
    program: &Path,
    processor: Option<ProcessorId>,
    config: Option<&Path>,
    max_cycles: Option<u64>,
    trace: bool,
    json: bool,
) -> Result<u64, SimError> {
    let mut config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(id) = processor {
        config.pipeline.processor = id;
        config.pipeline.shape = None;
    }
    if let Some(limit) = max_cycles {
        config.general.max_cycles = limit;
    }
    config.general.trace |= trace;
    init_logging(config.general.trace);

    let program = loader::load_program(program)?;
    let mut sim = Simulator::new(&config, program)?;
    let status = sim.run();
    let pipeline = &sim.pipeline;

    if json {
        let state = serde_json::json!({
            "processor": config.pipeline.processor.name(),
            "status": format!("{status:?}"),
            "cycles": pipeline.cycle(),
            "instructions": pipeline.stats().instructions_retired,
            "registers": pipeline.registers().snapshot().to_vec(),
        });
        println!("{state:#}");
    } else {
        println!();
        println!("Processor: {}  Status: {status:?}", config.pipeline.processor);
        pipeline.stats().print();
        for (idx, value) in pipeline.registers().snapshot().iter().enumerate() {
            if *value != 0 {
                let reg = u8::try_from(idx).unwrap_or(0);
                println!("  x{idx:<2} {:<5} {value:#018x}", abi::xreg(reg));
            }
        }
    }

    Ok(match status {
        Status::Exited(code) => code,
        Status::Drained => 0,
        Status::Running => 1,
    })
}
