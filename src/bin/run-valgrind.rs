//! run-valgrind entry point.

use std::process::ExitCode;

use clap::Parser;
use qagate::cli::commands::valgrind::report_failure;
use qagate::cli::{Command, ValgrindCli, ValgrindCommand};
use qagate::logging::init_tracing;
use qagate::process::SystemExecutor;

fn main() -> ExitCode {
    let cli = ValgrindCli::parse();
    init_tracing(cli.global.debug);

    tracing::debug!("run-valgrind starting with args: {:?}", cli);

    let output = cli.output();
    let executor = SystemExecutor::new(output.clone());

    let result = cli.global.settings().and_then(|settings| {
        ValgrindCommand::new(&settings.memcheck, &cli).execute(&executor, &output)
    });

    match result {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            report_failure(&output, &e);
            ExitCode::from(1)
        }
    }
}
