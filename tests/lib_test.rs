//! Library integration tests.

use qagate::process::{
    run_process, run_process_with, InstallStatus, InstallationChecker, OutputLine, RunOptions,
    SystemExecutor,
};
use qagate::ui::{Output, OutputMode, QagateTheme};
use qagate::QagateError;

fn quiet_executor() -> SystemExecutor {
    SystemExecutor::new(Output::with_theme(OutputMode::Quiet, QagateTheme::plain()))
}

#[test]
fn error_types_are_public() {
    let err = QagateError::EmptyReport {
        path: "coverage.info".into(),
    };
    assert!(err.to_string().contains("coverage.info"));
    assert_eq!(err.kind(), "EmptyReport");
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> qagate::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use qagate::cli::LcovCli;

    let cli = LcovCli::parse_from(["run-lcov", "build", "t", "app"]);
    assert!(cli.runnable);
}

#[cfg(unix)]
#[test]
fn runner_streams_both_pipes_when_asked() {
    let options = RunOptions {
        live_print_errors: true,
        ..RunOptions::lenient()
    };
    let mut lines = Vec::new();
    let result = run_process_with(
        "sh",
        &["-c".to_string(), "echo out; echo err >&2; exit 5".to_string()],
        &options,
        |line| lines.push(line),
    )
    .unwrap();

    assert_eq!(result.exit_code, Some(5));
    assert!(lines.contains(&OutputLine::Stdout("out".into())));
    assert!(lines.contains(&OutputLine::Stderr("err".into())));
}

#[cfg(unix)]
#[test]
fn runner_prints_to_console_and_captures() {
    let result = run_process(
        "sh",
        &["-c".to_string(), "echo visible".to_string()],
        &RunOptions::default(),
    )
    .unwrap();

    assert!(result.success);
    assert_eq!(result.stdout, "visible\n");
}

#[cfg(unix)]
#[test]
fn installation_checker_finds_shell() {
    let status = InstallationChecker::new()
        .live_print(false)
        .check(&quiet_executor(), "sh");
    // Some shells reject --version, but starting them is enough.
    assert!(status.unwrap().is_installed());
}

#[test]
fn installation_checker_reports_missing_program() {
    let status = InstallationChecker::lenient()
        .check(&quiet_executor(), "qagate-no-such-tool")
        .unwrap();
    assert_eq!(
        status,
        InstallStatus::Missing {
            message: "Program qagate-no-such-tool is not installed.".into()
        }
    );
}
