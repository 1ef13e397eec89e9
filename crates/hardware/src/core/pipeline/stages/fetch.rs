//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the instruction pipeline. It
//! performs the following:
//! 1. **Sequencing:** Chooses the next fetch addresses from the PC, a replay queue
//!    of squashed-but-committed-path instructions, and any pending delayed redirect.
//! 2. **Bundling:** Pairs two instructions per cycle on dual-issue datapaths when
//!    they are independent.
//!
//! The stage is pure: it returns the fetched bundle and the front-end state that
//! takes effect if the fetch is committed at the tick.

use std::collections::VecDeque;

use crate::core::pipeline::control::PendingRedirect;
use crate::isa::instruction::Instruction;
use crate::sim::loader::{INST_BYTES, Program};

/// Fetch-side architectural state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontEnd {
    /// Next sequential fetch address.
    pub pc: u64,
    /// Redirect waiting for its delay slots.
    pub pending: Option<PendingRedirect>,
    /// Addresses to fetch again, oldest first, before resuming at `pc`.
    pub refetch: VecDeque<u64>,
}

impl FrontEnd {
    /// Front end starting at `pc`.
    pub fn at(pc: u64) -> Self {
        Self {
            pc,
            pending: None,
            refetch: VecDeque::new(),
        }
    }
}

/// Result of one fetch cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOutput {
    /// Fetched instructions with their addresses, oldest first.
    pub bundle: Vec<(u64, Instruction)>,
    /// Front-end state after the fetch.
    pub next: FrontEnd,
}

/// Returns `true` if `second` may issue in the same bundle as `first`.
///
/// Control transfers and system calls issue alone in the older lane, system
/// calls never pair as the younger instruction, at most one instruction per
/// bundle touches memory, and the younger lane may not read the older lane's
/// destination.
pub fn can_pair(first: &Instruction, second: &Instruction) -> bool {
    if first.op.is_branch_or_jump() || first.op.is_system_call() {
        return false;
    }
    if second.op.is_system_call() {
        return false;
    }
    if first.op.is_memory() && second.op.is_memory() {
        return false;
    }
    let dest = first.dest();
    dest == 0 || (second.src1() != dest && second.src2() != dest)
}

/// Executes the instruction fetch stage.
///
/// # Arguments
///
/// * `front`   - Front-end state at the start of the cycle.
/// * `program` - Instruction store.
/// * `width`   - Maximum instructions per cycle.
pub fn fetch_stage(front: &FrontEnd, program: &Program, width: usize) -> FetchOutput {
    let mut next = front.clone();
    let mut bundle: Vec<(u64, Instruction)> = Vec::with_capacity(width);

    while bundle.len() < width {
        if let Some(&pc) = next.refetch.front() {
            let Some(inst) = program.fetch(pc) else {
                next.refetch.clear();
                break;
            };
            if bundle.last().is_some_and(|(_, prev)| !can_pair(prev, &inst)) {
                break;
            }
            let _ = next.refetch.pop_front();
            bundle.push((pc, inst));
            continue;
        }

        let pc = next.pc;
        match program.fetch(pc) {
            Some(inst) => {
                if bundle.last().is_some_and(|(_, prev)| !can_pair(prev, &inst)) {
                    break;
                }
                bundle.push((pc, inst));
                if advance_sequential(&mut next) {
                    break;
                }
            }
            None => {
                // Past the program end a delay slot still elapses as an implicit nop.
                if next.pending.is_some() {
                    let _ = advance_sequential(&mut next);
                }
                break;
            }
        }
    }

    FetchOutput { bundle, next }
}

/// Moves past one sequential fetch, applying a due delayed redirect.
///
/// Returns `true` if fetch was redirected.
fn advance_sequential(front: &mut FrontEnd) -> bool {
    front.pc = front.pc.wrapping_add(INST_BYTES);
    let Some(mut pending) = front.pending else {
        return false;
    };
    if pending.consume(1) {
        front.pc = pending.target;
        front.pending = None;
        true
    } else {
        front.pending = Some(pending);
        false
    }
}
