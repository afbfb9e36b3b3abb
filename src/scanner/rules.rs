use crate::scanner::glob::{EntryFilter, expand_glob, match_in_dir};
use crate::scanner::walk::{WalkMode, walk};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a rule's resolved path is turned into concrete entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// The path itself, if it exists.
    File,
    /// Wildcard match against existing entries.
    Glob,
    /// Everything below the matched directories, directories included.
    WalkAll,
    /// Only the files below the matched directories.
    WalkFiles,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Glob => "glob",
            Self::WalkAll => "walk.all",
            Self::WalkFiles => "walk.files",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declarative cache location: a search mode and a path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRule {
    pub mode: SearchMode,
    pub template: &'static str,
}

impl PathRule {
    pub const fn new(mode: SearchMode, template: &'static str) -> Self {
        Self { mode, template }
    }
}

fn has_wildcard(path: &Path) -> bool {
    path.to_string_lossy().contains('*')
}

/// Matches the final segment of `path` against the entries of its parent.
fn match_leaf(path: &Path, filter: EntryFilter) -> Vec<PathBuf> {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return Vec::new();
    };
    if !parent.is_dir() {
        return Vec::new();
    }
    match_in_dir(parent, &name.to_string_lossy(), filter).unwrap_or_else(|err| {
        debug!(%err, "rule match skipped");
        Vec::new()
    })
}

/// Produces the concrete paths a single resolved rule path stands for.
///
/// Never fails: anything that cannot be read simply contributes nothing.
pub fn enumerate(path: &Path, mode: SearchMode) -> Vec<PathBuf> {
    match mode {
        SearchMode::File => {
            if path.exists() {
                vec![path.to_path_buf()]
            } else {
                Vec::new()
            }
        }
        SearchMode::Glob => {
            if has_wildcard(path) {
                expand_glob(path)
            } else {
                match_leaf(path, EntryFilter::FilesAndDirs)
            }
        }
        SearchMode::WalkAll | SearchMode::WalkFiles => {
            let walk_mode = if mode == SearchMode::WalkAll {
                WalkMode::FilesAndDirs
            } else {
                WalkMode::FilesOnly
            };
            let roots = if has_wildcard(path) {
                expand_glob(path)
            } else {
                match_leaf(path, EntryFilter::DirsOnly)
            };

            roots
                .iter()
                .filter(|root| root.is_dir())
                .flat_map(|root| {
                    walk(root, walk_mode).unwrap_or_else(|err| {
                        debug!(%err, "walk root skipped");
                        Vec::new()
                    })
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn search_modes_display_their_rule_names() {
        let names: Vec<String> = [
            SearchMode::File,
            SearchMode::Glob,
            SearchMode::WalkAll,
            SearchMode::WalkFiles,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(names, ["file", "glob", "walk.all", "walk.files"]);
    }

    #[test]
    fn file_mode_requires_existence() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("Network Persistent State");
        File::create(&file)?;

        assert_eq!(enumerate(&file, SearchMode::File), vec![file.clone()]);
        assert_eq!(
            enumerate(dir.path(), SearchMode::File),
            vec![dir.path().to_path_buf()]
        );
        assert!(enumerate(&dir.path().join("missing"), SearchMode::File).is_empty());
        Ok(())
    }

    #[test]
    fn glob_without_wildcard_matches_leaf_name() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("ShaderCache"))?;

        assert_eq!(
            enumerate(&dir.path().join("shadercache"), SearchMode::Glob),
            vec![dir.path().join("ShaderCache")]
        );
        Ok(())
    }

    #[test]
    fn walk_modes_differ_in_directories() -> Result<()> {
        let dir = tempdir()?;
        let cache = dir.path().join("Cache");
        fs::create_dir_all(cache.join("sub"))?;
        File::create(cache.join("a.txt"))?;
        File::create(cache.join("sub/b.txt"))?;

        let mut files = enumerate(&cache, SearchMode::WalkFiles);
        files.sort();
        assert_eq!(files, vec![cache.join("a.txt"), cache.join("sub/b.txt")]);

        let mut all = enumerate(&cache, SearchMode::WalkAll);
        all.sort();
        assert_eq!(
            all,
            vec![cache.join("a.txt"), cache.join("sub"), cache.join("sub/b.txt")]
        );
        Ok(())
    }

    #[test]
    fn walk_with_wildcard_walks_every_match() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        fs::create_dir_all(root.join("p1/GPUCache"))?;
        fs::create_dir_all(root.join("p2/GPUCache"))?;
        File::create(root.join("p1/GPUCache/data_0"))?;
        File::create(root.join("p2/GPUCache/data_1"))?;

        let mut found = enumerate(&root.join("p*/GPUCache"), SearchMode::WalkFiles);
        found.sort();
        assert_eq!(
            found,
            vec![root.join("p1/GPUCache/data_0"), root.join("p2/GPUCache/data_1")]
        );
        Ok(())
    }

    #[test]
    fn walk_of_file_contributes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("Cache");
        File::create(&file)?;

        assert!(enumerate(&file, SearchMode::WalkAll).is_empty());
        assert!(enumerate(&dir.path().join("gone"), SearchMode::WalkFiles).is_empty());
        Ok(())
    }
}
