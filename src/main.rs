//! provider-gate CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use provider_gate::cli::{Cli, CommandDispatcher};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// `--debug` enables `provider_gate=debug`. Otherwise `RUST_LOG` is used
/// when set and valid, falling back to `provider_gate=info`, so other
/// crates stay silent by default.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("provider_gate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("provider_gate=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = CommandDispatcher::new()
        .dispatch(cli, &mut out)
        .context("provider-gate command failed")?;
    out.flush()?;

    Ok(result.exit_code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("provider-gate starting with args: {:?}", cli);

    match run(&cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
