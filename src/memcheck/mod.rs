//! Memory analysis with `valgrind`.
//!
//! [`MemoryAnalysisDriver::analyze`] checks the target exists, runs the
//! analyzer with its report directed to a log file, and turns the error
//! count from the log's summary line into a pass or a
//! [`MemoryErrorsDetected`](crate::QagateError::MemoryErrorsDetected).

pub mod summary;

pub use summary::count_errors;

use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::MemcheckSettings;
use crate::error::{QagateError, Result};
use crate::process::{InstallationChecker, ProcessExecutor, RunOptions};
use crate::ui::Output;

/// Resolved inputs for one analysis run.
#[derive(Debug, Clone)]
pub struct MemcheckConfig {
    /// Memory analyzer.
    pub analyzer: String,
    /// Analyzer flags, without the log-file flag.
    pub flags: Vec<String>,
    /// Log file the analyzer writes its report to.
    pub log_file: PathBuf,
    /// Text right before the error count.
    pub summary_start: String,
    /// Text right after the error count.
    pub summary_end: String,
}

impl From<&MemcheckSettings> for MemcheckConfig {
    fn from(settings: &MemcheckSettings) -> Self {
        Self {
            analyzer: settings.analyzer.clone(),
            flags: settings.flags.clone(),
            log_file: settings.log_file.clone(),
            summary_start: settings.summary_start.clone(),
            summary_end: settings.summary_end.clone(),
        }
    }
}

impl MemcheckConfig {
    /// Full analyzer argument list for `target` run with `arguments`.
    pub fn analyzer_args(&self, target: &Path, arguments: &[String]) -> Vec<String> {
        let mut args = self.flags.clone();
        args.push(format!("--log-file={}", self.log_file.display()));
        args.push(target.to_string_lossy().into_owned());
        args.extend(arguments.iter().cloned());
        args
    }
}

/// Outcome of a clean analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemcheckReport {
    /// Analyzer that produced the log.
    pub analyzer: String,
    /// Analyzed executable.
    pub target: PathBuf,
    /// Arguments passed to the target.
    pub arguments: Vec<String>,
    /// Log the count was read from.
    pub log_file: PathBuf,
    /// Errors reported by the analyzer.
    pub error_count: u64,
}

/// Runs a target under the memory analyzer and checks its error summary.
pub struct MemoryAnalysisDriver<'a> {
    executor: &'a dyn ProcessExecutor,
    output: Output,
    config: MemcheckConfig,
}

impl<'a> MemoryAnalysisDriver<'a> {
    /// Create a driver running the analyzer through `executor`.
    pub fn new(executor: &'a dyn ProcessExecutor, output: Output, config: MemcheckConfig) -> Self {
        Self {
            executor,
            output,
            config,
        }
    }

    /// Analyze `target` run with `arguments`.
    ///
    /// Fails with [`QagateError::FileNotFound`] before anything runs if the
    /// target is missing, and with [`QagateError::MemoryErrorsDetected`]
    /// when the log reports a positive error count.
    pub fn analyze(&self, target: &Path, arguments: &[String]) -> Result<MemcheckReport> {
        if !target.is_file() {
            return Err(QagateError::FileNotFound {
                path: target.to_path_buf(),
            });
        }

        InstallationChecker::new().check(self.executor, &self.config.analyzer)?;

        remove_stale_log(&self.config.log_file)?;

        let args = self.config.analyzer_args(target, arguments);
        self.output.message(&format!(
            "Running memory analysis with {} {}",
            self.config.analyzer,
            args.join(" ")
        ));
        tracing::info!("On target {} with args {:?}", target.display(), arguments);

        let options = RunOptions {
            live_print_errors: true,
            ..RunOptions::lenient()
        };
        let result = self.executor.run(&self.config.analyzer, &args, &options)?;
        if !result.success {
            tracing::warn!(
                "{} exited with {:?}",
                self.config.analyzer,
                result.exit_code
            );
        }

        let log = read_log(&self.config.log_file)?;
        self.output.block(&log);

        let error_count = count_errors(&log, &self.config.summary_start, &self.config.summary_end)
            .map_err(|message| QagateError::LogParse {
                path: self.config.log_file.clone(),
                message,
            })?;
        tracing::info!("{} reported {} errors", self.config.analyzer, error_count);

        if error_count > 0 {
            return Err(QagateError::MemoryErrorsDetected {
                analyzer: self.config.analyzer.clone(),
                count: error_count,
            });
        }

        Ok(MemcheckReport {
            analyzer: self.config.analyzer.clone(),
            target: target.to_path_buf(),
            arguments: arguments.to_vec(),
            log_file: self.config.log_file.clone(),
            error_count,
        })
    }
}

fn remove_stale_log(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn read_log(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => QagateError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => e.into(),
    })
}
