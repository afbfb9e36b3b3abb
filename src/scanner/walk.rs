use crate::errors::ScanError;
use jwalk::{Parallelism, WalkDir};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether a walk reports directories alongside files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    FilesOnly,
    FilesAndDirs,
}

/// Lists everything below `root`, children before their parent directory.
///
/// The root itself is never reported. A directory that cannot be read drops
/// its own subtree only; the walk continues with its siblings.
pub fn walk(root: &Path, mode: WalkMode) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(Parallelism::Serial);

    let mut out = Vec::new();
    // Directories whose subtree is still being listed, innermost last.
    let mut open_dirs: Vec<(usize, PathBuf)> = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(%err, "walk branch skipped");
                continue;
            }
        };
        if entry.depth == 0 {
            continue;
        }

        // Anything opened at this depth or deeper is complete now.
        while let Some((depth, _)) = open_dirs.last() {
            if *depth < entry.depth {
                break;
            }
            if let Some((_, dir)) = open_dirs.pop() {
                out.push(dir);
            }
        }

        if let Some(err) = &entry.read_children_error {
            debug!(path = %entry.path().display(), %err, "subtree skipped");
        }

        if entry.file_type().is_dir() {
            if mode == WalkMode::FilesAndDirs {
                open_dirs.push((entry.depth, entry.path()));
            }
        } else {
            out.push(entry.path());
        }
    }

    while let Some((_, dir)) = open_dirs.pop() {
        out.push(dir);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn build_tree(root: &Path) -> Result<()> {
        fs::create_dir_all(root.join("sub/deeper"))?;
        fs::create_dir_all(root.join("empty"))?;
        File::create(root.join("a.txt"))?;
        File::create(root.join("sub/b.txt"))?;
        File::create(root.join("sub/deeper/c.txt"))?;
        File::create(root.join("z.txt"))?;
        Ok(())
    }

    #[test]
    fn files_only_excludes_directories() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        build_tree(root)?;

        let mut found = walk(root, WalkMode::FilesOnly)?;
        found.sort();

        assert_eq!(
            found,
            vec![
                root.join("a.txt"),
                root.join("sub/b.txt"),
                root.join("sub/deeper/c.txt"),
                root.join("z.txt"),
            ]
        );
        assert!(found.iter().all(|p| p.is_file()));
        Ok(())
    }

    #[test]
    fn directories_follow_all_descendants() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        build_tree(root)?;

        let found = walk(root, WalkMode::FilesAndDirs)?;
        let position = |p: &Path| found.iter().position(|f| f == p);

        assert_eq!(found.len(), 7);
        assert!(!found.contains(&root.to_path_buf()));
        for dir_path in [root.join("sub"), root.join("sub/deeper"), root.join("empty")] {
            assert_eq!(found.iter().filter(|p| **p == dir_path).count(), 1);
            let dir_index = position(&dir_path).expect("directory listed");
            for (i, p) in found.iter().enumerate() {
                if p != &dir_path && p.starts_with(&dir_path) {
                    assert!(i < dir_index, "{} listed after {}", p.display(), dir_path.display());
                }
            }
        }
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_drops_only_its_subtree() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let root = dir.path();
        fs::create_dir_all(root.join("locked/inner"))?;
        File::create(root.join("locked/inner/hidden.txt"))?;
        fs::create_dir_all(root.join("open"))?;
        File::create(root.join("open/seen.txt"))?;
        File::create(root.join("top.txt"))?;

        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;
        if fs::read_dir(&locked).is_ok() {
            // Permission bits do not bind this user (root).
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
            return Ok(());
        }

        let all = walk(root, WalkMode::FilesAndDirs);
        let files = walk(root, WalkMode::FilesOnly);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        let (all, files) = (all?, files?);

        assert!(all.contains(&locked));
        assert!(all.contains(&root.join("open/seen.txt")));
        assert!(all.contains(&root.join("top.txt")));
        assert!(!all.iter().any(|p| p.starts_with(locked.join("inner"))));

        assert!(!files.contains(&locked));
        assert_eq!(
            files.iter().filter(|p| p.ends_with("seen.txt") || p.ends_with("top.txt")).count(),
            2
        );
        Ok(())
    }

    #[test]
    fn missing_root_is_an_error() {
        let missing = PathBuf::from("/no/such/dir/cachesweep_walk_test");
        assert!(matches!(
            walk(&missing, WalkMode::FilesOnly),
            Err(ScanError::NotADirectory(_))
        ));
    }

    #[test]
    fn file_root_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("plain.txt");
        File::create(&file)?;

        assert!(walk(&file, WalkMode::FilesAndDirs).is_err());
        Ok(())
    }
}
