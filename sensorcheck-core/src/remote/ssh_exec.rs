//! SSH command execution
//!
//! Runs the sensors command on the remote host via the system `ssh` client
//! (or `sshpass -e ssh` for password-authenticated connections). One child
//! process is one session: it is waited for on success and killed on every
//! failure path, and the handle is kill-on-drop for anything in between.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::Instrument;

use super::auth::{AuthMethod, SshTarget};
use crate::error::ExecError;

/// Connection timeout passed to the ssh client (seconds)
pub const SSH_CONNECT_TIMEOUT_SECS: u64 = 10;

/// ssh reports its own failures (connect, auth, host key) with this status
const SSH_ERROR_STATUS: i32 = 255;

/// What sshpass means by its own exit statuses
fn sshpass_failure(code: i32) -> Option<&'static str> {
    match code {
        1 => Some("sshpass: invalid command line argument"),
        2 => Some("sshpass: conflicting arguments given"),
        3 => Some("sshpass: general runtime error"),
        4 => Some("sshpass: unrecognized response from ssh"),
        5 => Some("invalid or incorrect password"),
        6 => Some("host public key is unknown"),
        7 => Some("host public key has changed"),
        _ => None,
    }
}

/// Captured result of one remote command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutput {
    /// Standard output of the remote command
    pub stdout: String,
    /// Standard error of the remote command (diagnostic only)
    pub stderr: String,
    /// Exit status of the remote command, if it exited normally
    pub exit_code: Option<i32>,
}

impl RemoteOutput {
    /// Output with nothing on stderr and a zero exit status
    #[must_use]
    pub fn stdout_only(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }
}

/// Runs one shell command on a remote host and captures its output.
///
/// Implementations own the transport; the check pipeline only sees text.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Executes `command` and returns its captured output.
    ///
    /// Text on stderr is not an error. Only a session that could not be
    /// established, or a command that could not be run, fails.
    async fn exec(&self, command: &str) -> Result<RemoteOutput, ExecError>;
}

/// [`RemoteExecutor`] backed by the OpenSSH client
#[derive(Debug, Clone)]
pub struct SshExecutor {
    target: SshTarget,
    ssh_program: PathBuf,
    sshpass_program: PathBuf,
}

impl SshExecutor {
    /// Creates an executor for the given target using `ssh` from `PATH`
    #[must_use]
    pub fn new(target: SshTarget) -> Self {
        Self {
            target,
            ssh_program: PathBuf::from("ssh"),
            sshpass_program: PathBuf::from("sshpass"),
        }
    }

    /// Uses a specific ssh client binary
    #[must_use]
    pub fn with_ssh_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.ssh_program = program.into();
        self
    }

    /// Builds the client invocation for `command`.
    ///
    /// Newly seen host keys are accepted without prompting; a changed key
    /// is still rejected by ssh.
    #[must_use]
    pub fn build_command(&self, command: &str) -> Command {
        let mut cmd;

        match self.target.auth {
            AuthMethod::Password(ref password) => {
                cmd = Command::new(&self.sshpass_program);
                // sshpass -e reads the password from SSHPASS, never argv
                cmd.arg("-e").arg(&self.ssh_program);
                cmd.env("SSHPASS", password.expose_secret());
                cmd.arg("-o").arg("PubkeyAuthentication=no");
                cmd.arg("-o").arg("PreferredAuthentications=password,keyboard-interactive");
            }
            AuthMethod::KeyFile(ref key) => {
                cmd = Command::new(&self.ssh_program);
                cmd.arg("-o").arg("BatchMode=yes");
                cmd.arg("-o").arg("IdentitiesOnly=yes");
                cmd.arg("-i").arg(key);
            }
        }

        cmd.arg("-o").arg("StrictHostKeyChecking=accept-new");
        // Keep client chatter ("Permanently added ...") out of the remote stderr
        cmd.arg("-o").arg("LogLevel=ERROR");
        cmd.arg("-o").arg(format!("ConnectTimeout={SSH_CONNECT_TIMEOUT_SECS}"));
        cmd.arg("-p").arg(self.target.port.to_string());
        // Ends option parsing: a username starting with '-' stays a destination
        cmd.arg("--");
        cmd.arg(self.target.destination());
        cmd.arg(command);

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        cmd
    }

    fn spawn_error(&self, err: &std::io::Error) -> ExecError {
        let program = match self.target.auth {
            AuthMethod::Password(_) => &self.sshpass_program,
            AuthMethod::KeyFile(_) => &self.ssh_program,
        };
        if err.kind() == std::io::ErrorKind::NotFound {
            ExecError::RemoteExecution(format!(
                "'{}' not found; it is required for {} authentication",
                program.display(),
                self.target.auth.name()
            ))
        } else {
            ExecError::RemoteExecution(format!(
                "Failed to spawn '{}': {err}",
                program.display()
            ))
        }
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn exec(&self, command: &str) -> Result<RemoteOutput, ExecError> {
        let span = tracing::info_span!(
            "remote.exec",
            host = %self.target.host,
            port = self.target.port,
            auth = self.target.auth.name(),
        );
        self.run_session(command).instrument(span).await
    }
}

impl SshExecutor {
    async fn run_session(&self, command: &str) -> Result<RemoteOutput, ExecError> {
        tracing::debug!(username = %self.target.username, command, "Running remote command");

        let mut child = self
            .build_command(command)
            .spawn()
            .map_err(|e| self.spawn_error(&e))?;

        let collected = collect_session(&mut child).await;
        let (stdout, stderr, status) = match collected {
            Ok(collected) => collected,
            Err(e) => {
                close_session(&mut child).await;
                return Err(ExecError::RemoteExecution(format!(
                    "Failed to read SSH session output: {e}"
                )));
            }
        };

        let output = classify_exit(
            matches!(self.target.auth, AuthMethod::Password(_)),
            status,
            stdout,
            stderr,
        )?;

        if !output.stderr.trim().is_empty() {
            tracing::warn!("SSH command error: {}", output.stderr.trim());
        }
        if let Some(code) = output.exit_code.filter(|c| *c != 0) {
            tracing::warn!(exit_code = code, "Remote command exited with non-zero status");
        }

        Ok(output)
    }
}

/// Reads stdout and stderr to the end and reaps the child
async fn collect_session(child: &mut Child) -> std::io::Result<(Vec<u8>, Vec<u8>, ExitStatus)> {
    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("stdout was not captured"))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("stderr was not captured"))?;

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    tokio::try_join!(
        stdout_pipe.read_to_end(&mut stdout),
        stderr_pipe.read_to_end(&mut stderr),
    )?;

    let status = child.wait().await?;
    Ok((stdout, stderr, status))
}

/// Tears down a session that failed midway. Failure here is only logged.
async fn close_session(child: &mut Child) {
    if let Err(e) = child.kill().await {
        tracing::warn!(error = %e, "Failed to close SSH session");
    }
}

/// Maps the client's exit status onto the error taxonomy.
///
/// Status 255 is ssh's own failure. Under sshpass, 1 to 7 are sshpass's own
/// failures (arguments, runtime, password, host key). Any other status
/// belongs to the remote command and is returned with the output.
fn classify_exit(
    via_sshpass: bool,
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
) -> Result<RemoteOutput, ExecError> {
    let stderr = String::from_utf8_lossy(&stderr).into_owned();
    let detail = |fallback: &str| {
        let trimmed = stderr.trim();
        if trimmed.is_empty() {
            fallback.to_string()
        } else {
            trimmed.to_string()
        }
    };

    match status.code() {
        Some(SSH_ERROR_STATUS) => {
            return Err(ExecError::Connection(detail("ssh exited with status 255")));
        }
        Some(code) if via_sshpass => {
            if let Some(reason) = sshpass_failure(code) {
                return Err(ExecError::Connection(detail(reason)));
            }
        }
        None => {
            return Err(ExecError::RemoteExecution(format!(
                "ssh terminated without an exit status ({status})"
            )));
        }
        Some(_) => {}
    }

    let stdout = String::from_utf8(stdout)
        .map_err(|e| ExecError::RemoteExecution(format!("Invalid UTF-8 in SSH output: {e}")))?;

    Ok(RemoteOutput {
        stdout,
        stderr,
        exit_code: status.code(),
    })
}
