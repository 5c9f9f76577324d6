//! External process execution shared by both drivers.

pub mod executor;
pub mod install;
pub mod mock;
pub mod runner;

pub use executor::{ProcessExecutor, SystemExecutor};
pub use install::{InstallStatus, InstallationChecker};
pub use mock::{RecordedCall, RecordingExecutor};
pub use runner::{
    command_line, run_process, run_process_with, CommandResult, FailureSignal, OutputLine,
    RunOptions,
};
