//! Tern CLI
//!
//! Entry point for the `tern` binary. Parses CLI arguments and delegates
//! to the Runtime for execution.

use clap::Parser;
use std::process::ExitCode;
use tern_cli::{disassemble_file, Cli, CliResult, Runtime};
use tracing_subscriber::EnvFilter;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> CliResult<()> {
    if cli.disassemble {
        print!("{}", disassemble_file(&cli.file)?);
        return Ok(());
    }
    let mut runtime = Runtime::new(cli.vm_config())?;
    runtime.execute_file(&cli.file, &cli.argv())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", e.report());
            ExitCode::FAILURE
        }
    }
}
