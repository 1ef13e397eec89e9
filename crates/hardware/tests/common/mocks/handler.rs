use pipesim_core::common::reg::{NUM_REGS, RegisterFile};
use pipesim_core::core::pipeline::traits::{SyscallAction, SystemCallHandler};

/// Mock system-call handler.
///
/// Captures the register file on every call and answers with a scripted action,
/// exiting with `a0` once the script runs out.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    /// Register file seen by each call, in order.
    pub calls: Vec<[u64; NUM_REGS]>,
    script: Vec<SyscallAction>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers the first calls with `actions`, in order.
    pub fn scripted(actions: &[SyscallAction]) -> Self {
        let mut script = actions.to_vec();
        script.reverse();
        Self {
            calls: Vec::new(),
            script,
        }
    }
}

impl SystemCallHandler for RecordingHandler {
    fn system_call(&mut self, regs: &dyn RegisterFile) -> SyscallAction {
        let mut view = [0; NUM_REGS];
        for (idx, slot) in view.iter_mut().enumerate() {
            *slot = regs.read(idx as u8);
        }
        self.calls.push(view);
        self.script
            .pop()
            .unwrap_or_else(|| SyscallAction::Exit(view[10]))
    }
}
