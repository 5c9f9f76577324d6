//! Settings for both wrappers.
//!
//! Layering, later wins:
//! 1. Built-in defaults ([`Settings::default`])
//! 2. `<root>/.qagate.yml` or the file given with `--config`
//! 3. Command-line flags and `QAGATE_*` environment variables

pub mod loader;
pub mod settings;

pub use loader::{load_settings, parse_settings, DEFAULT_CONFIG_FILE};
pub use settings::{CoverageSettings, MemcheckSettings, Settings};
