//! Single-segment wildcard expansion.
//!
//! A `*` only ever stands for part of one path segment: the pattern
//! never crosses a separator and `**` has no recursive meaning. Paths with
//! several wildcard segments are expanded one segment at a time, left to
//! right, descending only into directories that match.
//!
//! Only `*` and `?` are wildcards. Brackets match themselves, so there are
//! no character classes.

use crate::errors::ScanError;
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Which entry kinds a directory match returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFilter {
    DirsOnly,
    FilesAndDirs,
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains('*')
}

/// Rewrites a segment pattern into `glob` syntax: runs of `*` collapse to
/// one and brackets are escaped.
fn segment_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '*' if out.ends_with('*') => {}
            '[' => out.push_str("[[]"),
            ']' => out.push_str("[]]"),
            other => out.push(other),
        }
    }
    out
}

/// Lists the entries of `dir` whose names match `pattern`, files before
/// directories, each group sorted by name.
pub fn match_in_dir(
    dir: &Path,
    pattern: &str,
    filter: EntryFilter,
) -> Result<Vec<PathBuf>, ScanError> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }
    let pattern =
        Pattern::new(&segment_pattern(pattern)).map_err(|source| ScanError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

    let read_dir = fs::read_dir(dir).map_err(|e| ScanError::io(dir, e))?;

    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| ScanError::io(dir, e))?;
        let name = entry.file_name();
        if !pattern.matches_with(&name.to_string_lossy(), MATCH_OPTIONS) {
            continue;
        }
        // Follow symlinks for the dir/file decision, like a plain `is_dir`.
        if entry.path().is_dir() {
            dirs.push(entry.path());
        } else if filter == EntryFilter::FilesAndDirs {
            files.push(entry.path());
        }
    }
    files.sort();
    dirs.sort();
    files.extend(dirs);
    Ok(files)
}

/// Expands the wildcard segments of `path` against the filesystem.
///
/// A path without `*` is returned as-is (existence is not checked). A missing
/// or unreadable directory along the way contributes nothing.
pub fn expand_glob(path: &Path) -> Vec<PathBuf> {
    let components: Vec<Component> = path.components().collect();
    let Some(star) = components
        .iter()
        .position(|c| has_wildcard(&c.as_os_str().to_string_lossy()))
    else {
        return vec![path.to_path_buf()];
    };

    let parent: PathBuf = components[..star].iter().collect();
    let parent = if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent
    };
    let pattern = components[star].as_os_str().to_string_lossy().into_owned();
    let suffix: PathBuf = components[star + 1..].iter().collect();

    if !parent.is_dir() {
        return Vec::new();
    }

    let filter = if suffix.as_os_str().is_empty() {
        EntryFilter::FilesAndDirs
    } else {
        EntryFilter::DirsOnly
    };

    let matches = match match_in_dir(&parent, &pattern, filter) {
        Ok(matches) => matches,
        Err(err) => {
            debug!(%err, "glob branch skipped");
            return Vec::new();
        }
    };

    if filter == EntryFilter::FilesAndDirs {
        return matches;
    }
    // A literal remainder is not checked for existence, but its parent must be.
    matches
        .iter()
        .flat_map(|dir| expand_glob(&dir.join(&suffix)))
        .filter(|found| found.parent().is_some_and(Path::is_dir))
        .collect()
}
