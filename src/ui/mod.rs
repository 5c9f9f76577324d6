//! Console output for the wrappers.
//!
//! - [`Output`] prints status lines and streamed tool output by [`OutputMode`]
//! - [`QagateTheme`] styles the wrappers' own messages
//! - [`ProgressSpinner`] covers commands whose output is captured in bulk

pub mod output;
pub mod spinner;
pub mod theme;

pub use output::{Output, OutputMode};
pub use spinner::ProgressSpinner;
pub use theme::{should_use_colors, QagateTheme};
