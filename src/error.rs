//! Error types for tmuxer
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for tmuxer
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Tmux error: {0}")]
    Tmux(#[from] TmuxError),

    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No project selected")]
    SelectionCancelled,

    #[error("No projects found under the configured base paths")]
    NoProjectsFound,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("No project base path provided (use --base or set `base` in the config file)")]
    NoProjectBase,

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Project discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Could not determine home directory")]
    HomeNotFound,

    #[error("Failed to resolve path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to walk '{pattern}': {reason}")]
    Walk { pattern: String, reason: String },
}

/// Tmux integration errors
#[derive(Error, Debug)]
pub enum TmuxError {
    #[error("Tmux is not installed or not in PATH")]
    NotInstalled,

    #[error("Tmux command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Session '{0}' not found in tmux")]
    SessionNotFound(String),

    #[error("Tmux command timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// TUI-related errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Failed to initialize terminal: {0}")]
    InitFailed(String),

    #[error("Failed to restore terminal: {0}")]
    RestoreFailed(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Event handling error: {0}")]
    EventError(String),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::NoProjectBase;
        assert!(err.to_string().contains("No project base path"));

        let err = TmuxError::NotInstalled;
        assert!(err.to_string().contains("not installed"));

        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/foo.yaml"));
        assert!(err.to_string().contains("/tmp/foo.yaml"));

        let err = DiscoveryError::Walk {
            pattern: "/nope/**/.git".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains("/nope/**/.git"));
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::NoProjectBase;
        let top_err: Error = config_err.into();
        assert!(matches!(top_err, Error::Config(ConfigError::NoProjectBase)));

        let tmux_err = TmuxError::NotInstalled;
        let _top_err: Error = tmux_err.into();

        let discovery_err = DiscoveryError::HomeNotFound;
        let top_err: Error = discovery_err.into();
        assert!(top_err.to_string().contains("home directory"));
    }
}
