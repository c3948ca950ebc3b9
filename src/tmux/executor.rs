//! Async tmux command executor
//!
//! Provides tmux command execution with:
//! - Timeout handling for non-interactive commands
//! - Interactive commands (attach) that inherit the terminal
//! - Detection of the "no server running" state

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result, TmuxError};

/// Default command timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Messages tmux prints when no server is listening on the socket
const NO_SERVER_MARKERS: [&str; 2] = ["no server running", "error connecting to"];

/// The session commands the orchestrator needs from a terminal multiplexer
#[async_trait]
pub trait Multiplexer: Send + Sync {
    /// Names of all live sessions; empty when no server is running
    async fn list_sessions(&self) -> Result<Vec<String>>;

    /// Create a detached session rooted at `working_dir`
    async fn new_session(&self, name: &str, working_dir: &Path) -> Result<()>;

    /// Attach the current terminal to a session
    async fn attach_session(&self, target: &str) -> Result<()>;

    /// Switch the current client to a session
    async fn switch_client(&self, target: &str) -> Result<()>;
}

/// Async tmux command executor
#[derive(Debug, Clone)]
pub struct TmuxExecutor {
    /// Command timeout
    timeout: Duration,
    /// Server socket name (`tmux -L`), default server when `None`
    socket_name: Option<String>,
}

impl TmuxExecutor {
    /// Create a new executor with default settings
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            socket_name: None,
        }
    }

    /// Set the command timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Talk to the server on a named socket instead of the default one
    pub fn with_socket_name(mut self, name: impl Into<String>) -> Self {
        self.socket_name = Some(name.into());
        self
    }

    /// Check if tmux is installed and accessible
    pub async fn check_installed(&self) -> Result<()> {
        let output = Command::new("tmux")
            .arg("-V")
            .output()
            .await
            .map_err(|_| TmuxError::NotInstalled)?;

        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            debug!("tmux version: {}", version.trim());
            Ok(())
        } else {
            Err(TmuxError::NotInstalled.into())
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("tmux");
        if let Some(socket) = &self.socket_name {
            cmd.args(["-L", socket]);
        }
        cmd.args(args);
        cmd
    }

    fn describe(args: &[&str]) -> String {
        format!("tmux {}", args.join(" "))
    }

    /// Execute a tmux command and return its output
    #[instrument(skip(self), fields(args = ?args))]
    pub async fn execute(&self, args: &[&str]) -> Result<String> {
        let mut cmd = self.command(args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Execute with timeout
        let result = timeout(self.timeout, cmd.output()).await;

        match result {
            Ok(Ok(output)) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                    Err(TmuxError::CommandFailed {
                        command: Self::describe(args),
                        stderr,
                    }
                    .into())
                }
            }
            Ok(Err(e)) => {
                warn!("tmux command failed: {}", e);
                Err(spawn_error(args, e))
            }
            Err(_) => Err(TmuxError::Timeout(self.timeout).into()),
        }
    }

    /// Execute a tmux command attached to the current terminal.
    ///
    /// With `limit` set the command is abandoned after that long.
    #[instrument(skip(self), fields(args = ?args))]
    pub async fn execute_interactive(&self, args: &[&str], limit: Option<Duration>) -> Result<()> {
        let mut cmd = self.command(args);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = match limit {
            Some(limit) => timeout(limit, cmd.status())
                .await
                .map_err(|_| TmuxError::Timeout(limit))?,
            None => cmd.status().await,
        }
        .map_err(|e| spawn_error(args, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(TmuxError::CommandFailed {
                command: Self::describe(args),
                stderr: format!("exited with {}", status),
            }
            .into())
        }
    }
}

impl Default for TmuxExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Multiplexer for TmuxExecutor {
    async fn list_sessions(&self) -> Result<Vec<String>> {
        match self
            .execute(&["list-sessions", "-F", "#{session_name}"])
            .await
        {
            Ok(output) => Ok(parse_session_names(&output)),
            Err(Error::Tmux(TmuxError::CommandFailed { stderr, .. })) if is_no_server(&stderr) => {
                debug!("No tmux server running");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn new_session(&self, name: &str, working_dir: &Path) -> Result<()> {
        let working_dir = working_dir.to_string_lossy().into_owned();
        self.execute(&["new-session", "-d", "-s", name, "-c", working_dir.as_str()])
            .await?;
        Ok(())
    }

    async fn attach_session(&self, target: &str) -> Result<()> {
        // Blocks until the user detaches
        self.execute_interactive(&["attach-session", "-t", target], None)
            .await
    }

    async fn switch_client(&self, target: &str) -> Result<()> {
        self.execute_interactive(&["switch-client", "-t", target], Some(self.timeout))
            .await
    }
}

fn spawn_error(args: &[&str], e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        TmuxError::NotInstalled.into()
    } else {
        TmuxError::CommandFailed {
            command: TmuxExecutor::describe(args),
            stderr: e.to_string(),
        }
        .into()
    }
}

/// Whether tmux stderr means "no server", which is an empty session list
pub fn is_no_server(stderr: &str) -> bool {
    NO_SERVER_MARKERS.iter().any(|m| stderr.contains(m))
}

/// One session name per non-empty line
pub fn parse_session_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_creation() {
        let executor = TmuxExecutor::new();
        assert_eq!(executor.timeout, DEFAULT_TIMEOUT);
        assert!(executor.socket_name.is_none());
    }

    #[test]
    fn test_executor_with_custom_settings() {
        let executor = TmuxExecutor::new()
            .with_timeout(Duration::from_secs(10))
            .with_socket_name("tmuxer-test");

        assert_eq!(executor.timeout, Duration::from_secs(10));
        assert_eq!(executor.socket_name.as_deref(), Some("tmuxer-test"));
    }

    #[test]
    fn test_no_server_detection() {
        assert!(is_no_server("no server running on /tmp/tmux-1000/default"));
        assert!(is_no_server(
            "error connecting to /tmp/tmux-1000/default (No such file or directory)"
        ));
        assert!(!is_no_server("can't find session: foo"));
    }

    #[test]
    fn test_parse_session_names() {
        let names = parse_session_names("api\nweb-app\n\n  dotfiles  \n");
        assert_eq!(names, vec!["api", "web-app", "dotfiles"]);
        assert!(parse_session_names("").is_empty());
    }

    // Tests against a real tmux server live in tests/integration_test.rs
}
