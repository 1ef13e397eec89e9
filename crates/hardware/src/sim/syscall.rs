//! System-call servicing.
//!
//! Implements the small subset of the Linux/RARS `ecall` convention that test
//! programs rely on. The call number is read from `a7` and the argument from `a0`.

use tracing::{info, warn};

use crate::common::reg::RegisterFile;
use crate::core::pipeline::traits::{SyscallAction, SystemCallHandler};
use crate::isa::abi::{REG_A0, REG_A7};

/// `a7` value: print `a0` as a signed integer.
pub const SYS_PRINT_INT: u64 = 1;
/// `a7` value: exit with code 0.
pub const SYS_EXIT: u64 = 10;
/// `a7` value: print the low byte of `a0` as a character.
pub const SYS_PRINT_CHAR: u64 = 11;
/// `a7` value: exit with code `a0`.
pub const SYS_EXIT2: u64 = 93;

/// Handler that writes console output to stdout and keeps a copy of it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultHandler {
    /// Everything printed so far.
    pub output: String,
    /// Call numbers that were not recognized, in order.
    pub unsupported: Vec<u64>,
    echo: bool,
}

impl DefaultHandler {
    /// Handler that also echoes console output to stdout.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    fn emit(&mut self, text: &str) {
        if self.echo {
            print!("{text}");
        }
        self.output.push_str(text);
    }
}

impl SystemCallHandler for DefaultHandler {
    fn system_call(&mut self, regs: &dyn RegisterFile) -> SyscallAction {
        let number = regs.read(REG_A7);
        let arg = regs.read(REG_A0);
        let action = match number {
            SYS_EXIT => SyscallAction::Exit(0),
            SYS_EXIT2 => SyscallAction::Exit(arg),
            SYS_PRINT_INT => {
                self.emit(&(arg as i64).to_string());
                SyscallAction::Continue
            }
            SYS_PRINT_CHAR => {
                self.emit(&char::from(arg as u8).to_string());
                SyscallAction::Continue
            }
            other => {
                warn!(number = other, "unsupported system call ignored");
                self.unsupported.push(other);
                SyscallAction::Continue
            }
        };
        if let SyscallAction::Exit(code) = action {
            info!(code, "exit system call");
        }
        action
    }
}
