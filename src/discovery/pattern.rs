//! Base pattern splitting
//!
//! A base pattern such as `/home/u/code/**/{.git}` is split into the directory
//! the walk starts from (`/home/u/code`) and the glob matched below it
//! (`**/{.git}`).

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

/// Unescaped glob syntax that makes a final segment a marker pattern.
///
/// The prefix consumes plain characters and `\x` escape pairs, so an escaped
/// metacharacter never starts a match. Brackets and braces must be closed.
static GLOB_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^\\]|\\.)*?(?:\*|\?|\[[^\]]*\]|\{[^}]*\})").unwrap()
});

/// A base pattern split into a literal walk root and a glob suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePatternSplit {
    /// Directory the walk starts from (never contains glob syntax)
    pub base_dir: PathBuf,
    /// Pattern matched against paths relative to `base_dir`
    pub suffix_pattern: String,
    /// Whether the last segment is a glob (marker mode)
    pub is_glob_pattern: bool,
}

impl BasePatternSplit {
    /// Split a normalized base pattern.
    ///
    /// Everything before the first segment containing glob syntax becomes the
    /// base directory. A pattern with no glob syntax at all is split before its
    /// last segment, so the walk matches that segment literally.
    pub fn split(pattern: &str) -> Self {
        let segments: Vec<&str> = pattern.split('/').collect();

        let split_at = segments
            .iter()
            .position(|s| has_glob_meta(s))
            .unwrap_or(segments.len().saturating_sub(1));

        let base = segments[..split_at].join("/");
        let suffix_pattern = segments[split_at..].join("/");

        let base_dir = if base.is_empty() {
            if pattern.starts_with('/') {
                PathBuf::from("/")
            } else {
                PathBuf::from(".")
            }
        } else {
            PathBuf::from(base)
        };

        let last_segment = suffix_pattern.rsplit('/').next().unwrap_or("");

        Self {
            base_dir,
            is_glob_pattern: is_glob_segment(last_segment),
            suffix_pattern,
        }
    }

    /// Deepest level a match can sit at, or `None` if `**` makes it unbounded
    pub fn max_depth(&self) -> Option<usize> {
        if self.suffix_pattern.split('/').any(|s| s.contains("**")) {
            None
        } else {
            Some(self.suffix_pattern.split('/').count())
        }
    }
}

/// Whether a single path segment contains unescaped glob metacharacters
pub fn has_glob_meta(segment: &str) -> bool {
    let mut escaped = false;
    for c in segment.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '*' | '?' | '[' | '{' => return true,
            _ => {}
        }
    }
    false
}

/// Whether a segment is a complete glob, as opposed to a literal name.
///
/// Stricter than [`has_glob_meta`]: a lone `[` or `{` still ends the walk root
/// but does not make the segment a marker.
pub fn is_glob_segment(segment: &str) -> bool {
    has_glob_meta(segment) && GLOB_SEGMENT.is_match(segment)
}

/// Append the marker alternation to a pattern ending in `**`.
///
/// `~/code/**` with markers `.git`, `.hg` becomes `~/code/**/{.git,.hg}`.
/// Other patterns are returned unchanged.
pub fn expand_markers(pattern: &str, markers: &[String]) -> String {
    let ends_with_globstar = pattern.rsplit('/').next() == Some("**");
    if !ends_with_globstar || markers.is_empty() {
        return pattern.to_string();
    }
    format!("{}/{{{}}}", pattern, markers.join(","))
}
