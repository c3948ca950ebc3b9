//! Path normalization
//!
//! Expands home-directory shorthand (`~`, `$HOME`, `${HOME}`), makes paths
//! absolute and cleans `.`/`..` segments lexically. Symlinks are never resolved.

use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;

use crate::error::DiscoveryError;

/// Prefixes that stand for the user's home directory
const HOME_TOKENS: [&str; 3] = ["${HOME}", "$HOME", "~"];

/// The current user's home directory, if the platform has one
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Normalize a user-supplied path or pattern against the real home directory
pub fn normalize_path(path: &str) -> Result<PathBuf, DiscoveryError> {
    normalize_path_with_home(path, home_dir().as_deref())
}

/// Normalize a path or pattern against an explicit home directory
///
/// Fails with [`DiscoveryError::HomeNotFound`] only when the input references
/// home and `home` is `None`.
pub fn normalize_path_with_home(
    path: &str,
    home: Option<&Path>,
) -> Result<PathBuf, DiscoveryError> {
    let expanded = match strip_home_token(path) {
        Some(rest) => {
            let home = home.ok_or(DiscoveryError::HomeNotFound)?;
            home.join(rest.trim_start_matches('/'))
        }
        None => PathBuf::from(path),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = std::env::current_dir().map_err(|e| DiscoveryError::InvalidPath {
            path: path.to_string(),
            reason: format!("cannot read current directory: {}", e),
        })?;
        cwd.join(expanded)
    };

    Ok(clean_path(&absolute))
}

/// Return the remainder after a home token, if the path starts with one.
///
/// The token must be followed by `/` or end the string, so `~user` and
/// `$HOMEDIR` are left alone.
fn strip_home_token(path: &str) -> Option<&str> {
    HOME_TOKENS.iter().find_map(|token| {
        path.strip_prefix(token)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Lexically clean a path: drop `.` segments and fold `..` into its parent
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Express `target` relative to `base`, both absolute.
///
/// Walks up with `..` when `target` is not below `base`. Returns `.` when the
/// two are equal.
pub fn relative_path(base: &Path, target: &Path) -> Result<PathBuf, DiscoveryError> {
    if !base.is_absolute() || !target.is_absolute() {
        return Err(DiscoveryError::InvalidPath {
            path: target.display().to_string(),
            reason: format!("cannot relate to '{}': both paths must be absolute", base.display()),
        });
    }

    let base = clean_path(base);
    let target = clean_path(target);
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Ok(rel)
}
