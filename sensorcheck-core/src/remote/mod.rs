//! Remote command execution over SSH
//!
//! Opens one session to one host, runs one fixed command and hands back the
//! captured text. No retries and no connection reuse.

mod auth;
mod ssh_exec;

pub use auth::{AuthMethod, DEFAULT_SSH_PORT, SshTarget};
pub use ssh_exec::{RemoteExecutor, RemoteOutput, SSH_CONNECT_TIMEOUT_SECS, SshExecutor};

/// The hardware-monitoring query run on the remote host
pub const SENSORS_COMMAND: &str = "sensors -j";
