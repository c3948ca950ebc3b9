//! Discovered project type

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// A project directory found under one of the configured bases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Human-readable label, relative to the base it was found under
    pub name: String,
    /// Absolute project directory; unique within a resolution
    pub full_path: PathBuf,
    /// `full_path` relative to the home directory
    pub home_path: PathBuf,
}

impl Project {
    pub fn new(name: impl Into<String>, full_path: PathBuf, home_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            full_path,
            home_path,
        }
    }

    /// Name usable as a tmux session target.
    ///
    /// tmux rewrites `.` and `:` in session names and reads them as
    /// window/pane separators in targets, so both become `_`.
    pub fn session_name(&self) -> String {
        self.name
            .chars()
            .map(|c| if c == '.' || c == ':' { '_' } else { c })
            .collect()
    }

    /// Home-relative path for display: `~/code/app`, or the full path when
    /// the project lies outside home
    pub fn display_path(&self) -> String {
        if self.home_path.starts_with("..") {
            return self.full_path.display().to_string();
        }
        if self.home_path == Path::new(".") {
            return "~".to_string();
        }
        format!("~/{}", self.home_path.display())
    }

    /// Preview text shown next to the picker list
    pub fn preview(&self) -> String {
        format!(
            "Name: {}\nFull Path: {}\nHome: {}",
            self.name,
            self.full_path.display(),
            self.display_path()
        )
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Case-insensitive by name, then by full path
fn compare(a: &Project, b: &Project) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.full_path.cmp(&b.full_path))
}

/// Sort projects into the order they are presented in
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(compare);
}
