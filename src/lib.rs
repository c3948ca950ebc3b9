//! tmuxer - open a tmux session for a project picked by fuzzy search
//!
//! Projects are discovered from configured base patterns such as
//! `~/code/**/{.git}`, offered in an interactive picker, and the chosen one
//! gets a tmux session rooted at its directory (reusing an existing one).
//!
//! # Modules
//!
//! - [`discovery`] - Path normalization, pattern splitting and project resolution
//! - [`tmux`] - tmux command execution and session orchestration
//! - [`tui`] - Selection boundary and the fuzzy picker
//! - [`config`] - Layered configuration (YAML file, environment, CLI)
//! - [`error`] - Error types

pub mod config;
pub mod discovery;
pub mod error;
pub mod tmux;
pub mod tui;

pub use config::Config;
pub use discovery::{Project, ProjectResolver, Resolution};
pub use error::{Error, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
