//! CLI argument parsing types using `clap`.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgGroup, Parser};
use sensorcheck_core::check::{CheckConfig, DEFAULT_EXPECTED_SENSORS};
use sensorcheck_core::error::ConfigError;
use sensorcheck_core::remote::{AuthMethod, DEFAULT_SSH_PORT, SshTarget};
use sensorcheck_core::sensors::{Range, Ranges};
use sensorcheck_core::tracing::{TracingConfig, TracingLevel};

/// Health-check for temperature/humidity sensors over SSH
#[derive(Parser, Debug)]
#[command(name = "sensorcheck")]
#[command(author, version, about = "Health-check for temperature/humidity sensors over SSH")]
#[command(group(
    ArgGroup::new("auth")
        .required(true)
        .multiple(false)
        .args(["password", "key"])
))]
pub struct Cli {
    /// IP/hostname of the mini-PC
    pub host: String,

    /// SSH username
    pub user: String,

    /// SSH password
    #[arg(long)]
    pub password: Option<String>,

    /// Path to SSH private key
    #[arg(long, value_name = "PATH")]
    pub key: Option<PathBuf>,

    /// SSH port of the remote host
    #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
    pub port: u16,

    /// Expected total number of sensors (temp+hum)
    #[arg(long, default_value_t = DEFAULT_EXPECTED_SENSORS)]
    pub expected_sensors: usize,

    /// Min/max temperature in °C
    #[arg(
        long,
        num_args = 2,
        value_names = ["MIN_TEMP", "MAX_TEMP"],
        default_values_t = [-20.0, 80.0],
        allow_negative_numbers = true
    )]
    pub temp_range: Vec<f64>,

    /// Min/max humidity in %
    #[arg(
        long,
        num_args = 2,
        value_names = ["MIN_HUM", "MAX_HUM"],
        default_values_t = [0.0, 100.0],
        allow_negative_numbers = true
    )]
    pub hum_range: Vec<f64>,

    /// Output raw sensor values as JSON and exit
    #[arg(long)]
    pub raw_json_output: bool,

    /// ssh client binary to run
    #[arg(long, value_name = "PATH", env = "SENSORCHECK_SSH", default_value = "ssh")]
    pub ssh_program: PathBuf,

    /// Increase diagnostic verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Custom log filter directive (overrides -v/-q)
    #[arg(long, value_name = "FILTER", env = "SENSORCHECK_LOG")]
    pub log_filter: Option<String>,

    /// Disable colored diagnostics
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,
}

impl Cli {
    /// Resolves the SSH target, checking it before any network activity
    pub fn target(&self) -> Result<SshTarget, ConfigError> {
        let auth = AuthMethod::from_options(self.password.clone(), self.key.clone())?;
        let target =
            SshTarget::new(self.host.clone(), self.user.clone(), auth).with_port(self.port);
        target.validate()?;
        Ok(target)
    }

    /// Check policy from the command line
    pub fn check_config(&self) -> CheckConfig {
        let defaults = Ranges::default();
        CheckConfig {
            expected_sensors: self.expected_sensors,
            ranges: Ranges {
                temp: range_from(&self.temp_range, defaults.temp),
                hum: range_from(&self.hum_range, defaults.hum),
            },
            raw_json_output: self.raw_json_output,
        }
    }

    /// Diagnostics configuration from -v/-q/--log-filter
    pub fn tracing_config(&self) -> TracingConfig {
        let config = TracingConfig::new()
            .with_level(TracingLevel::from_verbosity(self.verbose, self.quiet))
            .with_ansi(!self.no_color && std::io::stderr().is_terminal());
        match self.log_filter {
            Some(ref filter) => config.with_filter(filter.clone()),
            None => config,
        }
    }
}

/// clap guarantees exactly two values; the fallback only covers misuse
fn range_from(values: &[f64], fallback: Range) -> Range {
    match values {
        [min, max] => Range::new(*min, *max),
        _ => fallback,
    }
}
