//! Settings file discovery and loading.

use crate::config::settings::Settings;
use crate::error::{QagateError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file name, looked up in the workspace root.
pub const DEFAULT_CONFIG_FILE: &str = ".qagate.yml";

/// Load settings for `root`.
///
/// An explicit `config` path must exist. Without one, `<root>/.qagate.yml`
/// is used when present and built-in defaults otherwise.
pub fn load_settings(root: &Path, config: Option<&Path>) -> Result<Settings> {
    let path = match config {
        Some(path) => {
            let path = root.join(path);
            if !path.is_file() {
                return Err(QagateError::ConfigNotFound { path });
            }
            path
        }
        None => match find_default_config(root) {
            Some(path) => path,
            None => {
                tracing::debug!("No {} in {}, using defaults", DEFAULT_CONFIG_FILE, root.display());
                return Ok(Settings::default());
            }
        },
    };

    tracing::debug!("Loading settings from {}", path.display());
    let content = fs::read_to_string(&path)?;
    parse_settings(&content, &path)
}

/// Parse settings YAML. An empty document yields the defaults.
pub fn parse_settings(content: &str, path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(content).map_err(|e| QagateError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn find_default_config(root: &Path) -> Option<PathBuf> {
    let path = root.join(DEFAULT_CONFIG_FILE);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}
