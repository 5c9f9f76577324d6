//! The seam between drivers and real processes.

use crate::error::Result;
use crate::ui::{Output, ProgressSpinner};

use super::runner::{command_line, run_process_with, CommandResult, RunOptions};

/// Runs external programs on behalf of the drivers.
///
/// Drivers only talk to this trait, so tests can swap in
/// [`RecordingExecutor`](super::RecordingExecutor).
pub trait ProcessExecutor {
    /// Run `program` with `args` and return its captured output.
    fn run(&self, program: &str, args: &[String], options: &RunOptions) -> Result<CommandResult>;
}

/// Executor that spawns real processes and prints through [`Output`].
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    output: Output,
}

impl SystemExecutor {
    /// Create an executor printing through `output`.
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

impl ProcessExecutor for SystemExecutor {
    fn run(&self, program: &str, args: &[String], options: &RunOptions) -> Result<CommandResult> {
        let command = command_line(program, args);
        self.output.command(&command);

        let spinner = if !options.live_print
            && self.output.mode().shows_spinners()
            && console::Term::stdout().is_term()
        {
            ProgressSpinner::new(&format!("Running {}...", program))
        } else {
            ProgressSpinner::hidden()
        };

        let output = &self.output;
        let result = run_process_with(program, args, options, |line| output.tool_line(line));

        match &result {
            Ok(_) => spinner.finish(),
            Err(e) => spinner.finish_error(&e.to_string()),
        }
        result
    }
}
