//! CLI error types.

use sensorcheck_core::check::exit_codes;
use sensorcheck_core::error::ConfigError;
use sensorcheck_core::tracing::TracingError;

/// Errors raised before the check pipeline starts
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Diagnostics could not be set up
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// The async runtime could not be created
    #[error("Failed to create async runtime: {0}")]
    Runtime(std::io::Error),
}

impl CliError {
    /// Returns the exit code for this error.
    ///
    /// All of these are generic failures.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Tracing(_) | Self::Runtime(_) => exit_codes::FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_is_generic_failure() {
        assert_eq!(CliError::Config(ConfigError::MissingAuth).exit_code(), 1);
        assert_eq!(
            CliError::Runtime(std::io::Error::other("boom")).exit_code(),
            1
        );
    }

    #[test]
    fn test_config_message() {
        let err = CliError::from(ConfigError::KeyFileNotFound("/k".into()));
        assert_eq!(
            err.to_string(),
            "Configuration error: private key file not found: /k"
        );
    }
}
