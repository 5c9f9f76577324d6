//! Command-line interface for both wrappers.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{parse_bool, GlobalArgs, LcovCli, ValgrindCli};
pub use commands::{Command, CommandResult, LcovCommand, ValgrindCommand};
