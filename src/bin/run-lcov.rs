//! run-lcov entry point.

use std::process::ExitCode;

use clap::Parser;
use qagate::cli::{Command, LcovCli, LcovCommand};
use qagate::logging::init_tracing;
use qagate::process::SystemExecutor;

fn main() -> ExitCode {
    let cli = LcovCli::parse();
    init_tracing(cli.global.debug);

    tracing::debug!("run-lcov starting with args: {:?}", cli);

    let output = cli.global.output();
    let root = cli.global.root();
    let executor = SystemExecutor::new(output.clone());

    let result = cli.global.settings().and_then(|settings| {
        LcovCommand::new(&root, &settings.coverage, &cli).execute(&executor, &output)
    });

    match result {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            output.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
