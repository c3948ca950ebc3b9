//! Configuration module
//!
//! Handles user configuration (`~/.config/tmux/tmuxer.yaml`), environment
//! overrides and command-line merging.

mod settings;

pub use settings::*;
