//! Statistics Tests.

use pipesim_core::catalog::ProcessorId;
use pipesim_core::core::pipeline::signals::ForwardingSource;
use pipesim_core::isa::instruction::Instruction;
use pipesim_core::stats::{STATS_SECTIONS, SimStats};

use crate::common::builder::program::forwarding_chain;
use crate::common::harness::TestContext;

#[test]
fn forwards_are_counted_per_source() {
    let mut stats = SimStats::default();
    stats.record_forward(ForwardingSource::ExecuteStage);
    stats.record_forward(ForwardingSource::MemoryStage);
    stats.record_forward(ForwardingSource::MemoryStage);
    stats.record_forward(ForwardingSource::DecodeStage);
    assert_eq!(stats.forwards_execute, 1);
    assert_eq!(stats.forwards_memory, 2);
    assert_eq!(stats.forwards(), 3);
}

#[test]
fn ipc_of_an_idle_run_is_zero() {
    assert!(SimStats::default().ipc().abs() < f64::EPSILON);
}

#[test]
fn run_counters_match_the_program() {
    let mut ctx = TestContext::processor(ProcessorId::RV32_5S, &forwarding_chain());
    let _ = ctx.run();
    let stats = ctx.pipeline.stats();
    assert_eq!(stats.cycles, ctx.pipeline.cycle());
    assert_eq!(stats.instructions_retired, 3);
    assert_eq!(stats.forwards(), 2);
    assert_eq!(stats.stalls_data, 0);
    assert!(stats.ipc() > 0.0 && stats.ipc() < 1.0);
}

#[test]
fn printing_every_section_does_not_panic() {
    let mut ctx = TestContext::processor(ProcessorId::RV32_5S, &[Instruction::addi(1, 0, 1)]);
    let _ = ctx.run();
    let sections: Vec<String> = STATS_SECTIONS.iter().map(|s| (*s).to_owned()).collect();
    ctx.pipeline.stats().print_sections(&sections);
    ctx.pipeline.stats().print_sections(&[]);
    ctx.pipeline.stats().print();
}
