//! Error types for the sensor health-check.
//!
//! Only truly exceptional conditions live here: bad configuration, a remote
//! session that could not be established or run, and output that is not a
//! walkable sensor document. Missing sensors and out-of-range readings are
//! expected outcomes and are modelled by [`crate::check::Outcome`] instead.

use thiserror::Error;

use crate::check::exit_codes;

/// Invalid configuration, detected before any network activity
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Both `--password` and `--key` were supplied
    #[error("exactly one of password or key file must be given, not both")]
    ConflictingAuth,

    /// Neither `--password` nor `--key` was supplied
    #[error("one of password or key file is required")]
    MissingAuth,

    /// The private key file does not exist or is not a file
    #[error("private key file not found: {0}")]
    KeyFileNotFound(String),

    /// A required value is empty
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Failure to run the fixed command on the remote host
#[derive(Debug, Error)]
pub enum ExecError {
    /// The SSH session could not be established (unreachable host,
    /// authentication failure, connect timeout, rejected host key)
    #[error("SSH connection failed: {0}")]
    Connection(String),

    /// The command could not be run or its output could not be read
    #[error("Remote execution failed: {0}")]
    RemoteExecution(String),
}

/// The remote output is not a sensor document the flattener can walk
#[derive(Debug, Error)]
pub enum ParseError {
    /// Output is not well-formed JSON
    #[error("Error parsing sensors JSON: {0}")]
    Malformed(String),

    /// Output is JSON but the top level is not an object
    #[error("Error - non-deserializable data received: expected an object of chips, got {0}")]
    NotAMapping(&'static str),

    /// A chip entry is not an object of labeled fields
    #[error("Error - non-deserializable data received: chip '{chip}' is {kind}, not an object")]
    ChipNotAMapping {
        /// Chip identifier
        chip: String,
        /// JSON type found instead of an object
        kind: &'static str,
    },
}

/// Any fatal error raised while acquiring readings
#[derive(Debug, Error)]
pub enum CheckError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote execution error
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Parse error
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl CheckError {
    /// Returns the process exit code for this error.
    ///
    /// Parse failures get their dedicated "bad data" status, everything else
    /// is a generic failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Parse(_) => exit_codes::BAD_DATA,
            Self::Config(_) | Self::Exec(_) => exit_codes::FAILURE,
        }
    }
}

/// Result type for check operations
pub type CheckResult<T> = Result<T, CheckError>;
