//! Settings schema and defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level settings, as read from `.qagate.yml`.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Coverage report settings.
    pub coverage: CoverageSettings,

    /// Memory analysis settings.
    pub memcheck: MemcheckSettings,
}

/// Settings for `run-lcov`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageSettings {
    /// Coverage capture tool.
    pub lcov: String,

    /// HTML report generator.
    pub genhtml: String,

    /// Report workspace, relative to the workspace root.
    pub report_dir: PathBuf,

    /// Ignore-pattern file, relative to the workspace root.
    pub ignore_file: PathBuf,

    /// Name of the combined info file inside the report workspace.
    pub info_file: String,

    /// Enable branch coverage in capture and HTML generation.
    pub branch_coverage: bool,
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            lcov: "lcov".to_string(),
            genhtml: "genhtml".to_string(),
            report_dir: PathBuf::from("code_coverage_report"),
            ignore_file: PathBuf::from(".lcov-ignores"),
            info_file: "code_coverage.info".to_string(),
            branch_coverage: true,
        }
    }
}

impl CoverageSettings {
    /// Report workspace resolved against `root`.
    pub fn report_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.report_dir)
    }

    /// Ignore file resolved against `root`.
    pub fn ignore_file_in(&self, root: &Path) -> PathBuf {
        root.join(&self.ignore_file)
    }
}

/// Settings for `run-valgrind`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemcheckSettings {
    /// Memory analyzer.
    pub analyzer: String,

    /// Analyzer log file, relative to the working directory.
    pub log_file: PathBuf,

    /// Analyzer flags, without the log-file flag.
    pub flags: Vec<String>,

    /// Text right before the error count in the summary line.
    pub summary_start: String,

    /// Text right after the error count in the summary line.
    pub summary_end: String,
}

impl Default for MemcheckSettings {
    fn default() -> Self {
        Self {
            analyzer: "valgrind".to_string(),
            log_file: PathBuf::from("valgrind.log"),
            flags: [
                "--leak-check=full",
                "--show-leak-kinds=all",
                "--trace-children=yes",
                "--track-origins=yes",
                "--verbose",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            summary_start: "ERROR SUMMARY: ".to_string(),
            summary_end: "errors".to_string(),
        }
    }
}
