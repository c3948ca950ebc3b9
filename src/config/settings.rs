//! User configuration settings
//!
//! Layered configuration: defaults → YAML file → environment variables → CLI args

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::normalize_path;
use crate::error::{ConfigError, Result};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/tmux/tmuxer.yaml";

/// Prefix for environment variable overrides (`TMUXER_BASE`, ...)
pub const ENV_PREFIX: &str = "TMUXER_";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base patterns where projects are located, e.g. `~/code/**/{.git}`
    pub base: Vec<String>,

    /// Names that mark a directory as a project when a base ends in `**`
    pub marker: Vec<String>,

    /// Globs for directories and projects to skip
    pub ignore: Vec<String>,

    /// Timeout in seconds for non-interactive tmux commands
    pub command_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base: Vec::new(),
            marker: vec![".git".to_string()],
            ignore: Vec::new(),
            command_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// `path` is the `--config` value: `None` uses [`DEFAULT_CONFIG_PATH`] if
    /// it exists, `-` or an empty string skips the file.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some("") | Some("-") => None,
            Some(explicit) => {
                let path = normalize_path(explicit)?;
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path).into());
                }
                Some(path)
            }
            None => match normalize_path(DEFAULT_CONFIG_PATH) {
                Ok(path) => Some(path),
                Err(e) => {
                    debug!("No default config file: {}", e);
                    None
                }
            },
        };

        Self::load_from(file.as_deref())
    }

    /// Load configuration with an optional file layer
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()));

        if let Some(file) = file {
            debug!("Loading config file {:?}", file);
            // A missing file contributes nothing
            figment = figment.merge(Yaml::file(file));
        }

        let config: Config = figment
            // Layer environment variables (TMUXER_BASE, etc.)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        Ok(config)
    }

    /// Merge command-line values on top of the loaded configuration.
    ///
    /// Bases and ignore globs are appended; markers replace the configured
    /// list when any are given.
    pub fn merge_cli(&mut self, bases: Vec<String>, markers: Vec<String>, ignore: Vec<String>) {
        self.base.extend(bases);
        self.ignore.extend(ignore);
        if !markers.is_empty() {
            self.marker = markers;
        }
    }

    /// Check that there is something to resolve
    pub fn validate(&self) -> Result<()> {
        if self.base.is_empty() {
            return Err(ConfigError::NoProjectBase.into());
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "command_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Timeout for non-interactive tmux commands
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// The default config file path, if the home directory is known
    pub fn default_file_path() -> Option<PathBuf> {
        normalize_path(DEFAULT_CONFIG_PATH).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.base.is_empty());
        assert_eq!(config.marker, vec![".git".to_string()]);
        assert!(config.ignore.is_empty());
        assert_eq!(config.command_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tmuxer.yaml");
        std::fs::write(
            &path,
            "base:\n  - ~/code/**/{.git}\n  - ~/dotfiles\nignore:\n  - node_modules\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.base, vec!["~/code/**/{.git}", "~/dotfiles"]);
        assert_eq!(config.ignore, vec!["node_modules"]);
        assert_eq!(config.marker, vec![".git"]);
    }

    #[test]
    fn test_missing_file_layer_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert!(config.base.is_empty());
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = Config::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_disabled_file() {
        let config = Config::load(Some("-")).unwrap();
        assert_eq!(config.marker, vec![".git"]);
    }

    #[test]
    fn test_unparsable_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tmuxer.yaml");
        std::fs::write(&path, "base: [unterminated\n").unwrap();

        let err = Config::load_from(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::LoadFailed(_))));
    }

    #[test]
    fn test_merge_cli() {
        let mut config = Config {
            base: vec!["~/code/**".to_string()],
            ignore: vec!["target".to_string()],
            ..Config::default()
        };

        config.merge_cli(vec!["~/work/**".to_string()], vec![], vec!["vendor".to_string()]);
        assert_eq!(config.base, vec!["~/code/**", "~/work/**"]);
        assert_eq!(config.ignore, vec!["target", "vendor"]);
        assert_eq!(config.marker, vec![".git"]);

        config.merge_cli(vec![], vec![".hg".to_string()], vec![]);
        assert_eq!(config.marker, vec![".hg"]);
    }

    #[test]
    fn test_validate_requires_base() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NoProjectBase)));

        let config = Config {
            base: vec!["~/code".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
