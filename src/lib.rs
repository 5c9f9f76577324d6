//! qagate - Coverage and memory-analysis gates for CI.
//!
//! Two wrappers around external tools, each turning the tool's text
//! output into a pass/fail exit code:
//!
//! - `run-lcov` captures coverage with `lcov`, strips ignored files and
//!   renders HTML with `genhtml`
//! - `run-valgrind` runs a target under `valgrind` and fails when the
//!   error summary is non-zero
//!
//! # Modules
//!
//! - [`cli`] - Argument parsing and the two commands
//! - [`config`] - Settings loading and defaults
//! - [`coverage`] - The `lcov`/`genhtml` pipeline
//! - [`error`] - Error types and result aliases
//! - [`logging`] - Tracing setup
//! - [`memcheck`] - The `valgrind` driver and log parsing
//! - [`process`] - Running external programs
//! - [`ui`] - Console output
//!
//! # Example
//!
//! ```
//! use qagate::memcheck::count_errors;
//!
//! let count = count_errors("==1== ERROR SUMMARY: 2 errors from 2 contexts", "ERROR SUMMARY: ", "errors");
//! assert_eq!(count, Ok(2));
//! ```

pub mod cli;
pub mod config;
pub mod coverage;
pub mod error;
pub mod logging;
pub mod memcheck;
pub mod process;
pub mod ui;

pub use error::{QagateError, Result};
