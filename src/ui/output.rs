//! Output mode and writer.

use crate::process::OutputLine;

use super::theme::QagateTheme;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Status messages and streamed tool output.
    #[default]
    Normal,
    /// Errors and the final verdict only.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows streamed tool output.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Console writer that respects output mode.
///
/// Status and tool stdout go to stdout; warnings, errors and tool stderr
/// go to stderr.
#[derive(Debug, Clone)]
pub struct Output {
    mode: OutputMode,
    theme: QagateTheme,
}

impl Default for Output {
    fn default() -> Self {
        Self::new(OutputMode::Normal)
    }
}

impl Output {
    /// Create a new output writer with a theme suited to the terminal.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: QagateTheme::detect(),
        }
    }

    /// Create a writer with an explicit theme.
    pub fn with_theme(mode: OutputMode, theme: QagateTheme) -> Self {
        Self { mode, theme }
    }

    /// Get the output mode.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Get the theme.
    pub fn theme(&self) -> &QagateTheme {
        &self.theme
    }

    /// Print a plain status line.
    pub fn message(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    /// Print a header line.
    pub fn header(&self, title: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_header(title));
        }
    }

    /// Print the command about to run.
    pub fn command(&self, command: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_command(command));
        }
    }

    /// Print a success line.
    pub fn success(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    /// Print a warning line.
    pub fn warning(&self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    /// Print an error line. Shown in every mode.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    /// Print a block of captured tool output verbatim.
    pub fn block(&self, text: &str) {
        if self.mode.shows_command_output() && !text.is_empty() {
            println!("{}", text.trim_end_matches('\n'));
        }
    }

    /// Print one line streamed from a running tool.
    pub fn tool_line(&self, line: OutputLine) {
        if !self.mode.shows_command_output() {
            return;
        }
        match line {
            OutputLine::Stdout(l) => println!("{}", l),
            OutputLine::Stderr(l) => eprintln!("{}", l),
        }
    }
}
