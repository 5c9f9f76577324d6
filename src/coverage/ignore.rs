//! Ignore-pattern file loading.

use crate::error::{QagateError, Result};
use std::fmt;
use std::fs;
use std::path::Path;

/// A path glob removed from the coverage report, e.g. `*/unit_tests/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePattern(String);

impl IgnorePattern {
    /// Get the pattern text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IgnorePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read one pattern per line from `path`.
///
/// Lines are trimmed; blank lines and `#` comments are skipped.
pub fn read_ignore_list(path: &Path) -> Result<Vec<IgnorePattern>> {
    if !path.is_file() {
        return Err(QagateError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    tracing::info!("Reading ignored files from: {}", path.display());
    let content = fs::read_to_string(path)?;
    Ok(parse_ignore_list(&content))
}

/// Parse ignore-file content.
pub fn parse_ignore_list(content: &str) -> Vec<IgnorePattern> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| IgnorePattern(line.to_string()))
        .collect()
}
