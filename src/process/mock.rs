//! Recording executor for testing.
//!
//! `RecordingExecutor` implements [`ProcessExecutor`] without spawning
//! anything. Every call is recorded, and responses come from per-program
//! handlers that may also touch the filesystem (e.g. to fake an output
//! file).
//!
//! # Example
//!
//! ```
//! use qagate::process::{ProcessExecutor, RecordingExecutor, RunOptions};
//!
//! let exec = RecordingExecutor::new();
//! exec.respond("lcov", |args| Ok(RecordingExecutor::output(&args.join(" "), "summary")));
//!
//! let result = exec.run("lcov", &["--list".to_string()], &RunOptions::lenient()).unwrap();
//! assert_eq!(result.stdout, "summary");
//! assert_eq!(exec.programs(), vec!["lcov".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::error::{QagateError, Result};

use super::executor::ProcessExecutor;
use super::runner::{command_line, CommandResult, RunOptions};

type Handler = Box<dyn Fn(&[String]) -> Result<CommandResult>>;

/// A call captured by [`RecordingExecutor`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Program name as passed to `run`.
    pub program: String,
    /// Arguments as passed to `run`.
    pub args: Vec<String>,
    /// Options as passed to `run`.
    pub options: RunOptions,
}

/// Executor that records calls and answers from handlers.
///
/// Programs without a handler succeed with empty output. Programs marked
/// with [`missing`](Self::missing) fail to spawn.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: RefCell<Vec<RecordedCall>>,
    handlers: RefCell<HashMap<String, Handler>>,
    missing: RefCell<HashSet<String>>,
}

impl RecordingExecutor {
    /// Create an executor with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer calls to `program` with `handler`, replacing any earlier one.
    pub fn respond<F>(&self, program: &str, handler: F)
    where
        F: Fn(&[String]) -> Result<CommandResult> + 'static,
    {
        self.handlers
            .borrow_mut()
            .insert(program.to_string(), Box::new(handler));
    }

    /// Make `program` fail to spawn, as if it were not on PATH.
    pub fn missing(&self, program: &str) {
        self.missing.borrow_mut().insert(program.to_string());
    }

    /// Successful result with the given stdout.
    pub fn output(command: &str, stdout: &str) -> CommandResult {
        CommandResult::success(
            command.to_string(),
            stdout.to_string(),
            String::new(),
            Duration::ZERO,
        )
    }

    /// Failed result with the given exit code and stderr.
    pub fn failed(command: &str, code: i32, stderr: &str) -> CommandResult {
        CommandResult::failure(
            command.to_string(),
            Some(code),
            String::new(),
            stderr.to_string(),
            Duration::ZERO,
        )
    }

    /// Calls made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Program names called so far, in order.
    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.program.clone())
            .collect()
    }

    /// Calls whose first argument is `flag`, e.g. `--remove`.
    pub fn calls_with_flag(&self, program: &str, flag: &str) -> Vec<RecordedCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program == program && c.args.first().map(String::as_str) == Some(flag))
            .cloned()
            .collect()
    }
}

impl ProcessExecutor for RecordingExecutor {
    fn run(&self, program: &str, args: &[String], options: &RunOptions) -> Result<CommandResult> {
        self.calls.borrow_mut().push(RecordedCall {
            program: program.to_string(),
            args: args.to_vec(),
            options: options.clone(),
        });

        if self.missing.borrow().contains(program) {
            return Err(QagateError::ProcessSpawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }

        let result = match self.handlers.borrow().get(program) {
            Some(handler) => handler(args)?,
            None => Self::output(&command_line(program, args), ""),
        };

        if options.throw_on_failure && options.failure_signal.is_failure(&result) {
            return Err(QagateError::CommandFailed {
                command: result.command,
                code: result.exit_code,
                stderr: result.stderr,
            });
        }
        Ok(result)
    }
}
