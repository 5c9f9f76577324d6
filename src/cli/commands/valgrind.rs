//! The `run-valgrind` command.
//!
//! This is the one place where failures become an exit code instead of
//! an error: any error from the analysis is printed as a diagnosis and the
//! command reports exit code 1.

use std::path::PathBuf;

use crate::cli::args::ValgrindCli;
use crate::config::MemcheckSettings;
use crate::error::{QagateError, Result};
use crate::memcheck::{MemcheckConfig, MemoryAnalysisDriver};
use crate::process::ProcessExecutor;
use crate::ui::Output;

use super::{Command, CommandResult};

/// Runs the target under the memory analyzer.
pub struct ValgrindCommand {
    config: MemcheckConfig,
    target: PathBuf,
    arguments: Vec<String>,
    json: bool,
}

impl ValgrindCommand {
    /// Create the command from parsed arguments and merged settings.
    pub fn new(settings: &MemcheckSettings, cli: &ValgrindCli) -> Self {
        let mut settings = settings.clone();
        cli.apply(&mut settings);

        Self {
            config: MemcheckConfig::from(&settings),
            target: cli.target.clone(),
            arguments: cli.arguments.clone(),
            json: cli.json,
        }
    }
}

impl Command for ValgrindCommand {
    fn execute(&self, executor: &dyn ProcessExecutor, output: &Output) -> Result<CommandResult> {
        let driver = MemoryAnalysisDriver::new(executor, output.clone(), self.config.clone());

        match driver.analyze(&self.target, &self.arguments) {
            Ok(report) => {
                if self.json {
                    let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
                    println!("{}", json);
                } else {
                    output.success(&format!(
                        "{} found no errors in {}",
                        report.analyzer,
                        report.target.display()
                    ));
                }
                Ok(CommandResult::success())
            }
            Err(e) => {
                report_failure(output, &e);
                Ok(CommandResult::failure(1))
            }
        }
    }
}

/// Print the diagnosis for a failed analysis.
pub fn report_failure(output: &Output, err: &QagateError) {
    tracing::debug!("Memory analysis failed: {:?}", err);
    output.error(&format!(
        "{} occurred while trying to run memory analysis.",
        err.kind()
    ));
    output.error(&format!("Error states: {}", err));
}
