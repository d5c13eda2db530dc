//! `sensorcheck` Core Library
//!
//! Remote health-check of temperature and humidity sensors: runs
//! `sensors -j` on one host over SSH, extracts the readings and checks them
//! against an expected count and configured ranges.
//!
//! # Crate Structure
//!
//! - [`remote`] - SSH target, authentication and command execution
//! - [`sensors`] - Document parsing, flattening, validation, emulator
//! - [`check`] - The pipeline, its [`check::Outcome`] and exit codes
//! - [`error`] - Error taxonomy
//! - [`tracing`] - Subscriber setup

#![warn(missing_docs)]

pub mod check;
pub mod error;
pub mod remote;
pub mod sensors;
pub mod tracing;

pub use check::{CheckConfig, Outcome, acquire_readings, report, run_check};
pub use error::{CheckError, CheckResult, ConfigError, ExecError, ParseError};
pub use remote::{AuthMethod, RemoteExecutor, RemoteOutput, SENSORS_COMMAND, SshExecutor, SshTarget};
pub use sensors::{
    DataQualityWarning, Flattened, Range, Ranges, Readings, SensorDocument, SensorKind,
    ValidationIssue, flatten, validate,
};
