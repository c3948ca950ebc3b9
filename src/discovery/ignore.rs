//! Ignore globs for project discovery
//!
//! Patterns containing `/` are home-expanded and matched against absolute
//! paths. Patterns without `/` match a single path component name.

use std::path::Path;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

use super::normalize::normalize_path_with_home;
use crate::error::DiscoveryError;

/// Compiled ignore patterns
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    paths: GlobSet,
    names: GlobSet,
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl IgnoreSet {
    /// An ignore set that matches nothing
    pub fn empty() -> Self {
        Self {
            paths: GlobSet::empty(),
            names: GlobSet::empty(),
        }
    }

    /// Compile ignore patterns
    pub fn new(patterns: &[String], home: Option<&Path>) -> Result<Self, DiscoveryError> {
        let mut paths = GlobSetBuilder::new();
        let mut names = GlobSetBuilder::new();

        for pattern in patterns {
            if pattern.contains('/') {
                let normalized = normalize_path_with_home(pattern, home)?;
                paths.add(compile(pattern, &normalized.to_string_lossy())?);
            } else {
                names.add(compile(pattern, pattern)?);
            }
        }

        Ok(Self {
            paths: build(paths)?,
            names: build(names)?,
        })
    }

    /// Whether nothing is ignored
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.names.is_empty()
    }

    /// Whether an absolute path is ignored by its full path or its final name
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.paths.is_match(path) {
            return true;
        }
        path.file_name()
            .is_some_and(|name| self.names.is_match(Path::new(name)))
    }
}

fn compile(original: &str, glob: &str) -> Result<Glob, DiscoveryError> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map_err(|e| DiscoveryError::InvalidPattern {
            pattern: original.to_string(),
            reason: e.kind().to_string(),
        })
}

fn build(builder: GlobSetBuilder) -> Result<GlobSet, DiscoveryError> {
    builder.build().map_err(|e| DiscoveryError::InvalidPattern {
        pattern: e.glob().unwrap_or("<ignore set>").to_string(),
        reason: e.kind().to_string(),
    })
}
