//! The `sensorcheck` command: wires the CLI to the core pipeline.

use sensorcheck_core::check::{Outcome, run_check};
use sensorcheck_core::remote::SshExecutor;

use crate::cli::Cli;
use crate::error::CliError;

/// Runs the health check described by `cli`, writing the report to stdout.
///
/// Configuration is resolved and checked first; nothing touches the network
/// unless it is valid. Pipeline failures come back as an [`Outcome`], not an
/// error.
pub fn cmd_check(cli: &Cli) -> Result<Outcome, CliError> {
    let target = cli.target()?;
    let config = cli.check_config();
    tracing::debug!(
        destination = %target.destination(),
        port = target.port,
        auth = target.auth.name(),
        "Starting sensor check"
    );
    let executor = SshExecutor::new(target).with_ssh_program(&cli.ssh_program);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    Ok(runtime.block_on(run_check(&executor, &config, &mut out)))
}
