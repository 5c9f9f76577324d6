//! CLI argument definitions.
//!
//! Each binary has its own parser ([`LcovCli`], [`ValgrindCli`]); both
//! flatten [`GlobalArgs`]. Options go before the positional arguments,
//! everything after the target is passed to the target untouched.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{load_settings, CoverageSettings, MemcheckSettings, Settings};
use crate::error::QagateError;
use crate::ui::{Output, OutputMode, QagateTheme};

/// Flags shared by both binaries.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GlobalArgs {
    /// Workspace root that relative paths resolve against (default: current directory)
    #[arg(long, env = "QAGATE_ROOT")]
    pub root: Option<PathBuf>,

    /// Path to settings file (overrides <root>/.qagate.yml)
    #[arg(short, long, env = "QAGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only print errors and the final verdict
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl GlobalArgs {
    /// Resolve the workspace root.
    pub fn root(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
    }

    /// Load settings for the workspace root.
    pub fn settings(&self) -> crate::Result<Settings> {
        load_settings(&self.root(), self.config.as_deref())
    }

    /// Build the console writer these flags ask for.
    pub fn output(&self) -> Output {
        let mode = if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        };
        if self.no_color {
            Output::with_theme(mode, QagateTheme::plain())
        } else {
            Output::new(mode)
        }
    }
}

/// run-lcov - Generate a filtered lcov/genhtml coverage report.
#[derive(Debug, Parser)]
#[command(name = "run-lcov")]
#[command(author, version, about, long_about = None)]
pub struct LcovCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Coverage capture tool
    #[arg(long, env = "QAGATE_LCOV")]
    pub lcov: Option<String>,

    /// HTML report generator
    #[arg(long, env = "QAGATE_GENHTML")]
    pub genhtml: Option<String>,

    /// Report workspace, recreated on each run
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// File with one ignore pattern per line
    #[arg(long)]
    pub ignore_file: Option<PathBuf>,

    /// Disable branch coverage
    #[arg(long)]
    pub no_branch_coverage: bool,

    /// The build directory for lcov, relative to --root
    pub build_directory: PathBuf,

    /// Set to true if the target is runnable (true/t/1 or false/f/0)
    #[arg(value_parser = parse_bool, action = clap::ArgAction::Set)]
    pub runnable: bool,

    /// Binary target to run before capture, relative to --root
    pub target: PathBuf,

    /// Arguments passed to the target binary
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub arguments: Vec<String>,
}

impl LcovCli {
    /// Apply command-line overrides on top of file settings.
    pub fn apply(&self, settings: &mut CoverageSettings) {
        if let Some(lcov) = &self.lcov {
            settings.lcov = lcov.clone();
        }
        if let Some(genhtml) = &self.genhtml {
            settings.genhtml = genhtml.clone();
        }
        if let Some(dir) = &self.report_dir {
            settings.report_dir = dir.clone();
        }
        if let Some(file) = &self.ignore_file {
            settings.ignore_file = file.clone();
        }
        if self.no_branch_coverage {
            settings.branch_coverage = false;
        }
    }
}

/// run-valgrind - Fail when valgrind reports memory errors.
#[derive(Debug, Parser)]
#[command(name = "run-valgrind")]
#[command(author, version, about, long_about = None)]
pub struct ValgrindCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Memory analyzer
    #[arg(long, env = "QAGATE_VALGRIND")]
    pub analyzer: Option<String>,

    /// Log file for the analyzer report
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print the analysis result as JSON
    #[arg(long)]
    pub json: bool,

    /// Full path to the binary target that will be analyzed
    pub target: PathBuf,

    /// Arguments passed to the target binary
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub arguments: Vec<String>,
}

impl ValgrindCli {
    /// Build the console writer. With `--json`, stdout carries the report only.
    pub fn output(&self) -> Output {
        if self.json {
            GlobalArgs {
                quiet: true,
                ..self.global.clone()
            }
            .output()
        } else {
            self.global.output()
        }
    }

    /// Apply command-line overrides on top of file settings.
    pub fn apply(&self, settings: &mut MemcheckSettings) {
        if let Some(analyzer) = &self.analyzer {
            settings.analyzer = analyzer.clone();
        }
        if let Some(log_file) = &self.log_file {
            settings.log_file = log_file.clone();
        }
    }
}

/// Parse a boolean-like value: `true`/`t`/`1` or `false`/`f`/`0`, any case.
pub fn parse_bool(value: &str) -> crate::Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(QagateError::InvalidBool {
            value: value.to_string(),
        }),
    }
}
