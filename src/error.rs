//! Error types for qagate operations.
//!
//! This module defines [`QagateError`], the error type shared by the
//! process runner, both drivers and the CLI, and a [`Result`] alias.
//!
//! # Error Handling Strategy
//!
//! - Structural failures (missing info file, empty report, missing target)
//!   get their own variant so callers can match on them
//! - Tool failures inside the coverage filter loop are logged, not raised
//! - `anyhow::Error` is accepted through [`QagateError::Other`]

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for qagate operations.
#[derive(Debug, Error)]
pub enum QagateError {
    /// A tool required by a driver cannot be started.
    #[error("Program {program} is not installed.")]
    NotInstalled { program: String },

    /// Configuration or ignore-list file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// The coverage capture step did not produce its info file.
    #[error("{tool} did not generate {path}")]
    ReportGeneration { tool: String, path: PathBuf },

    /// The report workspace would wipe something it must not.
    #[error("Refusing to clean report directory {path}: {reason}")]
    UnsafeReportDir { path: PathBuf, reason: String },

    /// The filtered coverage report has no entries.
    #[error("Coverage report for {path} is empty")]
    EmptyReport { path: PathBuf },

    /// The executable could not be found or started.
    #[error("Failed to start {program}: {source}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A command ran but reported failure.
    #[error("Running command {command} returned an error (exit code {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The memory analyzer reported errors.
    #[error("{analyzer} found {count} errors")]
    MemoryErrorsDetected { analyzer: String, count: u64 },

    /// A file that must exist is missing.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The analyzer log has no readable error summary.
    #[error("Cannot read error summary from {path}: {message}")]
    LogParse { path: PathBuf, message: String },

    /// A boolean-like argument has an unrecognised value.
    #[error("invalid letter for boolean: \"{value}\"")]
    InvalidBool { value: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QagateError {
    /// Stable name of the error kind, used in CLI diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotInstalled { .. } => "NotInstalled",
            Self::ConfigNotFound { .. } => "ConfigNotFound",
            Self::ConfigParse { .. } => "ConfigParse",
            Self::ReportGeneration { .. } => "ReportGeneration",
            Self::UnsafeReportDir { .. } => "UnsafeReportDir",
            Self::EmptyReport { .. } => "EmptyReport",
            Self::ProcessSpawn { .. } => "ProcessSpawn",
            Self::CommandFailed { .. } => "CommandFailed",
            Self::MemoryErrorsDetected { .. } => "MemoryErrorsDetected",
            Self::FileNotFound { .. } => "FileNotFound",
            Self::LogParse { .. } => "LogParse",
            Self::InvalidBool { .. } => "InvalidBool",
            Self::Io(_) => "Io",
            Self::Other(_) => "Other",
        }
    }
}

/// Result type alias for qagate operations.
pub type Result<T> = std::result::Result<T, QagateError>;
