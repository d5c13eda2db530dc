//! `sensorcheck` - remote temperature/humidity sensor health-check
//!
//! Runs `sensors -j` on a host over SSH, then checks the sensor count and
//! ranges. Exit codes: 0 ok, 1 missing sensors or failure, 2 out of range,
//! 3 bad sensor data.

mod check;
mod cli;
mod error;

use clap::Parser;
use cli::Cli;
use sensorcheck_core::tracing::init_tracing;

fn main() {
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32, error::CliError> {
    init_tracing(&cli.tracing_config())?;

    let outcome = check::cmd_check(cli)?;
    if let Some(message) = outcome.diagnostic() {
        eprintln!("{message}");
    }
    Ok(outcome.exit_code())
}
