//! Project resolver
//!
//! Turns the configured base patterns into a deduplicated, sorted list of
//! projects. Each pattern is normalized, split into a walk root and a glob
//! suffix, and the root is walked with `walkdir` while `globset` matches the
//! suffix against paths relative to the root.
//!
//! A pattern whose last segment is a glob (`**/{.git}`) is in marker mode: the
//! project is the parent of each match. Otherwise every match is itself a
//! project directory.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use super::ignore::IgnoreSet;
use super::normalize::{home_dir, normalize_path_with_home, relative_path};
use super::pattern::{expand_markers, BasePatternSplit};
use super::project::{sort_projects, Project};
use crate::config::Config;
use crate::error::{DiscoveryError, Error, Result};

/// Outcome of resolving every base pattern
#[derive(Debug, Default)]
pub struct Resolution {
    /// Unique projects, sorted by name
    pub projects: Vec<Project>,
    /// Base patterns that could not be resolved, in configuration order
    pub failures: Vec<DiscoveryError>,
}

/// Resolves base patterns into projects
#[derive(Debug, Clone)]
pub struct ProjectResolver {
    /// Home directory used for `~` expansion and home-relative paths
    home: Option<PathBuf>,
    /// Marker names appended to patterns ending in `**`
    markers: Vec<String>,
    /// Directories and projects to skip
    ignore: IgnoreSet,
}

impl ProjectResolver {
    /// Create a resolver with an explicit home directory and no markers
    pub fn new(home: Option<PathBuf>) -> Self {
        Self {
            home,
            markers: Vec::new(),
            ignore: IgnoreSet::empty(),
        }
    }

    /// Set the marker names used to expand `**` patterns
    pub fn with_markers(mut self, markers: Vec<String>) -> Self {
        self.markers = markers;
        self
    }

    /// Set ignore patterns
    pub fn with_ignore(mut self, patterns: &[String]) -> Result<Self> {
        self.ignore = IgnoreSet::new(patterns, self.home.as_deref())?;
        Ok(self)
    }

    /// Resolve all base patterns.
    ///
    /// A pattern that fails is recorded in [`Resolution::failures`] and the
    /// remaining patterns are still resolved. The first project seen for a
    /// full path wins.
    pub fn resolve(&self, bases: &[String]) -> Resolution {
        let mut found: HashMap<PathBuf, Project> = HashMap::new();
        let mut failures = Vec::new();

        for base in bases {
            match self.resolve_pattern(base) {
                Ok(projects) => {
                    for project in projects {
                        if found.contains_key(&project.full_path) {
                            debug!("Duplicate project {:?} from '{}'", project.full_path, base);
                            continue;
                        }
                        found.insert(project.full_path.clone(), project);
                    }
                }
                Err(e) => {
                    warn!("Skipping base '{}': {}", base, e);
                    failures.push(e);
                }
            }
        }

        let mut projects: Vec<Project> = found.into_values().collect();
        sort_projects(&mut projects);

        info!(
            "Resolved {} projects from {} bases ({} failed)",
            projects.len(),
            bases.len(),
            failures.len()
        );

        Resolution { projects, failures }
    }

    /// Resolve a single raw base pattern
    #[instrument(skip(self))]
    pub fn resolve_pattern(&self, base: &str) -> std::result::Result<Vec<Project>, DiscoveryError> {
        let normalized = normalize_path_with_home(base, self.home.as_deref())?;
        let pattern = expand_markers(&normalized.to_string_lossy(), &self.markers);
        let split = BasePatternSplit::split(&pattern);

        debug!(
            "Walking {:?} for '{}' (marker mode: {})",
            split.base_dir, split.suffix_pattern, split.is_glob_pattern
        );

        self.walk(&pattern, &split)
    }

    fn walk(
        &self,
        pattern: &str,
        split: &BasePatternSplit,
    ) -> std::result::Result<Vec<Project>, DiscoveryError> {
        if split.suffix_pattern.is_empty() {
            return Err(DiscoveryError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "nothing to match below the base directory".to_string(),
            });
        }

        let matcher = GlobBuilder::new(&split.suffix_pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| DiscoveryError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.kind().to_string(),
            })?
            .compile_matcher();

        // The root must be readable; failures below it are only logged
        std::fs::read_dir(&split.base_dir).map_err(|e| DiscoveryError::Walk {
            pattern: pattern.to_string(),
            reason: format!("{}: {}", split.base_dir.display(), e),
        })?;

        // Symlinked checkouts count; loops surface as entry errors below
        let mut walker = WalkDir::new(&split.base_dir).min_depth(1).follow_links(true);
        if let Some(depth) = split.max_depth() {
            walker = walker.max_depth(depth);
        }

        let mut projects = Vec::new();
        let mut entries = walker.into_iter();

        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable path under {:?}: {}", split.base_dir, e);
                    continue;
                }
            };

            let is_dir = entry.file_type().is_dir();
            if is_dir && self.ignore.is_ignored(entry.path()) {
                debug!("Ignoring {:?}", entry.path());
                entries.skip_current_dir();
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(&split.base_dir) else {
                continue;
            };
            if !matcher.is_match(rel) {
                continue;
            }
            let Some(rel) = rel.to_str() else {
                warn!("Skipping non UTF-8 path {:?}", entry.path());
                continue;
            };

            match self.project_for_match(split, rel) {
                Ok(project) if self.ignore.is_ignored(&project.full_path) => {
                    debug!("Ignoring project {:?}", project.full_path);
                }
                Ok(project) => {
                    debug!("Found project '{}' at {:?}", project.name, project.full_path);
                    projects.push(project);
                }
                Err(e) => warn!("Skipping match {:?}: {}", entry.path(), e),
            }

            // Nothing inside a marker directory is another project
            if split.is_glob_pattern && is_dir && self.is_marker(entry.file_name()) {
                entries.skip_current_dir();
            }
        }

        Ok(projects)
    }

    fn is_marker(&self, name: &OsStr) -> bool {
        self.markers.iter().any(|m| OsStr::new(m) == name)
    }

    /// Derive the project for a match relative to the walk root
    fn project_for_match(
        &self,
        split: &BasePatternSplit,
        rel: &str,
    ) -> std::result::Result<Project, DiscoveryError> {
        let (name, full_path) = if split.is_glob_pattern {
            match rel.rsplit_once('/') {
                Some((parent, _marker)) => (parent.to_string(), split.base_dir.join(parent)),
                // Marker sits directly in the walk root
                None => (dir_name(&split.base_dir), split.base_dir.clone()),
            }
        } else {
            (rel.to_string(), split.base_dir.join(rel))
        };

        let home = self.home.as_deref().ok_or(DiscoveryError::HomeNotFound)?;
        let home_path = relative_path(home, &full_path)?;

        Ok(Project::new(name, full_path, home_path))
    }
}

/// Validate `config` and resolve its bases against the real home directory.
///
/// Nothing is walked when the configuration has no base.
pub fn discover(config: &Config) -> Result<Vec<Project>> {
    discover_with_home(config, home_dir())
}

/// [`discover`] with an explicit home directory
pub fn discover_with_home(config: &Config, home: Option<PathBuf>) -> Result<Vec<Project>> {
    config.validate()?;

    let resolver = ProjectResolver::new(home)
        .with_markers(config.marker.clone())
        .with_ignore(&config.ignore)?;
    let resolution = resolver.resolve(&config.base);

    if resolution.projects.is_empty() {
        return Err(Error::NoProjectsFound);
    }
    Ok(resolution.projects)
}

/// Last component of a directory, or the whole path for `/`
fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
