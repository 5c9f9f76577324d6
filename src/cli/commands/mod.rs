//! CLI command implementations.
//!
//! Each binary builds one command and calls [`Command::execute`] with the
//! executor and console writer it set up, so commands can be driven with a
//! [`RecordingExecutor`](crate::process::RecordingExecutor) in tests.

pub mod lcov;
pub mod valgrind;

pub use lcov::LcovCommand;
pub use valgrind::ValgrindCommand;

use crate::error::Result;
use crate::process::ProcessExecutor;
use crate::ui::Output;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self, executor: &dyn ProcessExecutor, output: &Output) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}
