//! External process execution.
//!
//! [`run_process`] spawns a program with explicit arguments (no shell),
//! optionally streams its output while it runs, and returns everything it
//! wrote as a [`CommandResult`].

use crate::error::{QagateError, Result};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of running an external process.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Program and arguments joined with spaces, for diagnostics.
    pub command: String,

    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the process exited with code 0.
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(command: String, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            command,
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            command,
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// What counts as a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureSignal {
    /// Non-zero or missing exit code. Stderr is diagnostic only.
    #[default]
    ExitCode,
    /// Any non-empty stderr, regardless of exit code.
    Stderr,
}

impl FailureSignal {
    /// Check whether `result` is a failure under this signal.
    pub fn is_failure(&self, result: &CommandResult) -> bool {
        match self {
            Self::ExitCode => !result.success,
            Self::Stderr => !result.stderr.is_empty(),
        }
    }
}

/// Options for running a process.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Raise [`QagateError::CommandFailed`] when the failure signal fires.
    pub throw_on_failure: bool,

    /// Stream stdout lines while the process runs.
    pub live_print: bool,

    /// Also stream stderr lines (only with `live_print`).
    pub live_print_errors: bool,

    /// How failure is detected.
    pub failure_signal: FailureSignal,

    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            throw_on_failure: true,
            live_print: true,
            live_print_errors: false,
            failure_signal: FailureSignal::default(),
            cwd: None,
            env: HashMap::new(),
        }
    }
}

impl RunOptions {
    /// Options that hand failures back to the caller instead of raising.
    pub fn lenient() -> Self {
        Self {
            throw_on_failure: false,
            ..Default::default()
        }
    }

    /// Capture output in bulk instead of streaming it.
    pub fn quiet(mut self) -> Self {
        self.live_print = false;
        self
    }
}

/// A line of output read from a running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Run a process, printing streamed lines to the console.
pub fn run_process(program: &str, args: &[String], options: &RunOptions) -> Result<CommandResult> {
    run_process_with(program, args, options, |line| match line {
        OutputLine::Stdout(l) => println!("{}", l),
        OutputLine::Stderr(l) => eprintln!("{}", l),
    })
}

/// Run a process, handing streamed lines to `on_line` on the calling thread.
///
/// Each pipe gets its own reader thread that reads until the pipe closes,
/// so output written just before exit is never dropped.
pub fn run_process_with<F>(
    program: &str,
    args: &[String],
    options: &RunOptions,
    mut on_line: F,
) -> Result<CommandResult>
where
    F: FnMut(OutputLine),
{
    let start = Instant::now();
    let command = command_line(program, args);
    tracing::debug!("Running: {}", command);

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let spawn_error = |source: std::io::Error| QagateError::ProcessSpawn {
        program: program.to_string(),
        source,
    };

    let (stdout, stderr, status) = if options.live_print {
        let mut child = cmd.spawn().map_err(spawn_error)?;

        let stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("stdout of {} was not captured", program))?;
        let stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("stderr of {} was not captured", program))?;

        let (tx, rx) = mpsc::channel();
        let tx_stdout = tx.clone();
        let tx_stderr = options.live_print_errors.then(|| tx.clone());
        drop(tx);

        let stdout_handle =
            thread::spawn(move || drain_pipe(stdout_pipe, Some(tx_stdout), OutputLine::Stdout));
        let stderr_handle =
            thread::spawn(move || drain_pipe(stderr_pipe, tx_stderr, OutputLine::Stderr));

        // Ends once both readers have dropped their senders.
        for line in rx {
            on_line(line);
        }

        let stdout_output = stdout_handle.join().unwrap_or_default();
        let stderr_output = stderr_handle.join().unwrap_or_default();

        let status = child.wait()?;
        (stdout_output, stderr_output, status)
    } else {
        let output = cmd.output().map_err(spawn_error)?;
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status,
        )
    };

    let duration = start.elapsed();

    let result = if status.success() {
        CommandResult::success(command, stdout, stderr, duration)
    } else {
        CommandResult::failure(command, status.code(), stdout, stderr, duration)
    };

    tracing::debug!(
        "{} finished with exit code {:?} in {:?}",
        program,
        result.exit_code,
        result.duration
    );

    if options.throw_on_failure && options.failure_signal.is_failure(&result) {
        return Err(QagateError::CommandFailed {
            command: result.command,
            code: result.exit_code,
            stderr: result.stderr,
        });
    }

    Ok(result)
}

/// Join a program and its arguments for display.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read a pipe to EOF, forwarding each line when `tx` is set.
///
/// Invalid UTF-8 is replaced rather than ending the read, otherwise the
/// child could block on a full pipe.
fn drain_pipe<R: Read>(
    pipe: R,
    tx: Option<mpsc::Sender<OutputLine>>,
    wrap: fn(String) -> OutputLine,
) -> String {
    let mut reader = BufReader::new(pipe);
    let mut output = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                output.push_str(&line);
                if let Some(tx) = &tx {
                    let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
                    let _ = tx.send(wrap(trimmed));
                }
            }
        }
    }

    output
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    fn collect(program: &str, args: &[String], options: &RunOptions) -> (Result<CommandResult>, Vec<OutputLine>) {
        let mut lines = Vec::new();
        let result = run_process_with(program, args, options, |line| lines.push(line));
        (result, lines)
    }

    #[test]
    fn run_process_prints_and_returns_output() {
        let options = RunOptions {
            live_print_errors: true,
            ..Default::default()
        };
        let result = run_process("sh", &sh("echo hello; echo oops >&2"), &options).unwrap();

        assert!(result.success);
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.stderr, "oops\n");
    }

    #[test]
    fn run_process_raises_on_failure() {
        let err = run_process("sh", &sh("echo bad >&2; exit 3"), &RunOptions::default())
            .unwrap_err();

        match err {
            QagateError::CommandFailed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "bad\n");
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn run_process_in_bulk_mode_is_lenient_when_asked() {
        let result =
            run_process("sh", &sh("echo partial; exit 2"), &RunOptions::lenient().quiet()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(2));
        assert_eq!(result.stdout, "partial\n");
    }

    #[test]
    fn captures_stdout() {
        let (result, lines) = collect("sh", &sh("echo hello"), &RunOptions::default());
        let result = result.unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(lines, vec![OutputLine::Stdout("hello".into())]);
    }

    #[test]
    fn stderr_is_captured_but_not_streamed_by_default() {
        let (result, lines) = collect("sh", &sh("echo oops >&2"), &RunOptions::default());
        let result = result.unwrap();

        assert_eq!(result.stderr, "oops\n");
        assert!(lines.is_empty());
    }

    #[test]
    fn live_print_errors_streams_stderr() {
        let options = RunOptions {
            live_print_errors: true,
            ..Default::default()
        };
        let (_, lines) = collect("sh", &sh("echo oops >&2"), &options);

        assert_eq!(lines, vec![OutputLine::Stderr("oops".into())]);
    }

    #[test]
    fn bulk_mode_streams_nothing() {
        let options = RunOptions::default().quiet();
        let (result, lines) = collect("sh", &sh("echo a; echo b"), &options);

        assert_eq!(result.unwrap().stdout, "a\nb\n");
        assert!(lines.is_empty());
    }

    #[test]
    fn trailing_output_without_newline_is_kept() {
        let (result, lines) = collect("sh", &sh("echo first; printf last"), &RunOptions::default());

        assert_eq!(result.unwrap().stdout, "first\nlast");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], OutputLine::Stdout("last".into()));
    }

    #[test]
    fn output_written_right_before_exit_is_kept() {
        let script = "for i in 1 2 3 4 5 6 7 8 9 10; do echo line$i; done; exit 0";
        let (result, lines) = collect("sh", &sh(script), &RunOptions::default());

        assert_eq!(result.unwrap().stdout.lines().count(), 10);
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn non_zero_exit_raises_when_throwing() {
        let (result, _) = collect("sh", &sh("echo bad >&2; exit 3"), &RunOptions::default());

        match result {
            Err(QagateError::CommandFailed {
                command,
                code,
                stderr,
            }) => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "bad\n");
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn non_zero_exit_is_returned_when_lenient() {
        let (result, _) = collect("sh", &sh("echo bad >&2; exit 3"), &RunOptions::lenient());
        let result = result.unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stderr, "bad\n");
    }

    #[test]
    fn stderr_warning_is_not_failure_by_exit_code() {
        let (result, _) = collect("sh", &sh("echo warning >&2; exit 0"), &RunOptions::default());
        assert!(result.is_ok());
    }

    #[test]
    fn stderr_signal_treats_any_stderr_as_failure() {
        let options = RunOptions {
            failure_signal: FailureSignal::Stderr,
            ..Default::default()
        };
        let (result, _) = collect("sh", &sh("echo warning >&2; exit 0"), &options);
        assert!(matches!(result, Err(QagateError::CommandFailed { .. })));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let (result, _) = collect(
            "qagate-definitely-not-a-program",
            &[],
            &RunOptions::default(),
        );
        assert!(matches!(result, Err(QagateError::ProcessSpawn { .. })));
    }

    #[test]
    fn runs_in_cwd_with_env() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut options = RunOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        options.env.insert("QAGATE_TEST_VAR".into(), "value".into());

        let (result, _) = collect("sh", &sh("echo $QAGATE_TEST_VAR; pwd"), &options);
        let stdout = result.unwrap().stdout;

        assert!(stdout.starts_with("value\n"));
        let dir_name = temp.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(stdout.contains(&dir_name));
    }

    #[test]
    fn command_line_joins_program_and_args() {
        let args = vec!["--list".to_string(), "out.info".to_string()];
        assert_eq!(command_line("lcov", &args), "lcov --list out.info");
        assert_eq!(command_line("lcov", &[]), "lcov");
    }
}
