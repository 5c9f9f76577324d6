//! The `run-lcov` command.

use std::path::{Path, PathBuf};

use crate::cli::args::LcovCli;
use crate::config::CoverageSettings;
use crate::coverage::{CoverageConfig, CoverageDriver};
use crate::error::Result;
use crate::process::{InstallationChecker, ProcessExecutor, RunOptions};
use crate::ui::Output;

use super::{Command, CommandResult};

/// Optionally runs the target, then generates the coverage report.
pub struct LcovCommand {
    config: CoverageConfig,
    build_directory: PathBuf,
    runnable: bool,
    target: PathBuf,
    arguments: Vec<String>,
}

impl LcovCommand {
    /// Create the command from parsed arguments and merged settings.
    pub fn new(root: &Path, settings: &CoverageSettings, cli: &LcovCli) -> Self {
        let mut settings = settings.clone();
        cli.apply(&mut settings);

        Self {
            config: CoverageConfig::from_settings(&settings, root),
            build_directory: root.join(&cli.build_directory),
            runnable: cli.runnable,
            target: root.join(&cli.target),
            arguments: cli.arguments.clone(),
        }
    }

    fn run_target(&self, executor: &dyn ProcessExecutor, output: &Output) -> Result<()> {
        output.message(&format!(
            "Running target {} {:?}",
            self.target.display(),
            self.arguments
        ));
        executor.run(
            &self.target.to_string_lossy(),
            &self.arguments,
            &RunOptions::default(),
        )?;
        Ok(())
    }
}

impl Command for LcovCommand {
    fn execute(&self, executor: &dyn ProcessExecutor, output: &Output) -> Result<CommandResult> {
        if self.runnable {
            self.run_target(executor, output)?;
        }

        output.header(&format!(
            "Generating code coverage report based on build directory at {}",
            self.build_directory.display()
        ));
        InstallationChecker::new().check(executor, &self.config.lcov)?;

        let driver = CoverageDriver::new(executor, output.clone(), self.config.clone());
        let report = driver.generate(&self.build_directory)?;

        output.success(&format!(
            "Coverage report written to {}",
            report.workspace.join("index.html").display()
        ));
        Ok(CommandResult::success())
    }
}
