//! SSH target and authentication method

use std::fmt;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// How to authenticate against the remote host.
///
/// Password and key file are mutually exclusive.
#[derive(Clone)]
pub enum AuthMethod {
    /// Password authentication (fed to `sshpass` via the environment)
    Password(SecretString),
    /// Public key authentication with the given private key file
    KeyFile(PathBuf),
}

impl AuthMethod {
    /// Resolves the two optional CLI values into exactly one method.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConflictingAuth`] when both are given and
    /// [`ConfigError::MissingAuth`] when neither is.
    pub fn from_options(
        password: Option<String>,
        key: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        match (password, key) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingAuth),
            (None, None) => Err(ConfigError::MissingAuth),
            (Some(password), None) => Ok(Self::Password(SecretString::from(password))),
            (None, Some(key)) => Ok(Self::KeyFile(key)),
        }
    }

    /// Short name used in logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Password(_) => "password",
            Self::KeyFile(_) => "publickey",
        }
    }
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password([REDACTED])"),
            Self::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
        }
    }
}

/// A single remote host to query
#[derive(Debug, Clone)]
pub struct SshTarget {
    /// Remote hostname or IP
    pub host: String,
    /// SSH port
    pub port: u16,
    /// SSH username
    pub username: String,
    /// Authentication method
    pub auth: AuthMethod,
}

impl SshTarget {
    /// Creates a target on the default SSH port
    #[must_use]
    pub fn new(host: impl Into<String>, username: impl Into<String>, auth: AuthMethod) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: username.into(),
            auth,
        }
    }

    /// Sets the SSH port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Checks the target locally, before anything touches the network.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty host or username, or a key
    /// file that does not exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Empty("host"));
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::Empty("user"));
        }
        if let AuthMethod::KeyFile(ref key) = self.auth {
            if !key.is_file() {
                return Err(ConfigError::KeyFileNotFound(key.display().to_string()));
            }
        }
        Ok(())
    }

    /// `user@host` destination for the ssh client
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.username, self.host)
    }
}
