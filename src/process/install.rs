//! Installation checks for external tools.

use crate::error::{QagateError, Result};

use super::executor::ProcessExecutor;
use super::runner::RunOptions;

/// Outcome of an installation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    /// The tool started; `version` is the first line it printed.
    Installed { version: String },
    /// The tool could not be started.
    Missing { message: String },
}

impl InstallStatus {
    /// Check whether the tool is usable.
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }
}

/// Checks that a program is reachable by running `<program> --version`.
#[derive(Debug, Clone)]
pub struct InstallationChecker {
    throw_on_failure: bool,
    live_print: bool,
}

impl Default for InstallationChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallationChecker {
    /// Checker that raises [`QagateError::NotInstalled`] for missing tools.
    pub fn new() -> Self {
        Self {
            throw_on_failure: true,
            live_print: true,
        }
    }

    /// Checker that reports missing tools as [`InstallStatus::Missing`].
    pub fn lenient() -> Self {
        Self {
            throw_on_failure: false,
            ..Self::new()
        }
    }

    /// Stream the version output while checking (on by default).
    pub fn live_print(mut self, live_print: bool) -> Self {
        self.live_print = live_print;
        self
    }

    /// Check `program`, running it through `executor`.
    pub fn check(&self, executor: &dyn ProcessExecutor, program: &str) -> Result<InstallStatus> {
        tracing::info!("Checking if {} is installed", program);

        let options = RunOptions {
            live_print: self.live_print,
            ..RunOptions::lenient()
        };

        match executor.run(program, &["--version".to_string()], &options) {
            Ok(result) => {
                if !result.success {
                    tracing::warn!(
                        "{} --version exited with {:?}: {}",
                        program,
                        result.exit_code,
                        result.stderr.trim()
                    );
                }
                let version = first_line(&result.stdout)
                    .or_else(|| first_line(&result.stderr))
                    .unwrap_or_default();
                tracing::debug!("{} version: {}", program, version);
                Ok(InstallStatus::Installed { version })
            }
            Err(QagateError::ProcessSpawn { .. }) => {
                if self.throw_on_failure {
                    Err(QagateError::NotInstalled {
                        program: program.to_string(),
                    })
                } else {
                    Ok(InstallStatus::Missing {
                        message: format!("Program {} is not installed.", program),
                    })
                }
            }
            Err(e) => Err(e),
        }
    }
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
