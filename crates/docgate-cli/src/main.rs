//! # validate entry point
//!
//! Parses arguments, initialises logging on stderr, runs one validation
//! pass and maps its result onto the process exit code.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docgate_cli::{run, Cli, USAGE};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let Some(invocation) = cli.invocation() else {
        eprintln!("{USAGE}");
        return ExitCode::from(1);
    };

    tracing::debug!(
        schema = %invocation.schema_path.display(),
        pattern = %invocation.pattern,
        "validate starting"
    );

    match run(&invocation, std::io::stdout().lock()) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(1)
        }
    }
}
