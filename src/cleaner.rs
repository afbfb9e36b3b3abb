use crate::model::{CleanReport, ScannedItem};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Byte length of `path` if it is a regular file; anything else counts as zero.
///
/// Symlinks are not followed: deleting one frees nothing, so it sizes to zero.
pub fn file_size(path: &Path) -> u64 {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata.len(),
        Ok(_) => 0,
        Err(err) => {
            debug!(path = %path.display(), %err, "size unavailable");
            0
        }
    }
}

pub fn total_size(paths: &[PathBuf]) -> u64 {
    paths.par_iter().map(|p| file_size(p)).sum()
}

/// Pairs each path with its size, largest first. `progress_cb` fires once per path.
pub fn sized_items(paths: &[PathBuf], progress_cb: Option<&(dyn Fn() + Sync)>) -> Vec<ScannedItem> {
    let mut items: Vec<ScannedItem> = paths
        .par_iter()
        .map(|path| {
            if let Some(cb) = progress_cb {
                cb();
            }
            ScannedItem {
                path: path.clone(),
                size: file_size(path),
            }
        })
        .collect();
    items.sort_by(|a, b| b.size.cmp(&a.size));
    items
}

fn depth(path: &Path) -> usize {
    path.components().count()
}

/// Sorts directories so every child comes before its parent.
fn order_deepest_first<P: AsRef<Path>>(dirs: &mut [P]) {
    dirs.sort_by(|a, b| {
        let (a, b) = (a.as_ref(), b.as_ref());
        depth(b).cmp(&depth(a)).then_with(|| b.cmp(a))
    });
}

/// Deletes files first, then directories deepest-first.
///
/// Directory depth is the number of path components; ties fall back to the
/// path itself so the order is stable. Each directory is re-checked right
/// before removal since an earlier removal may already have taken it.
/// Failures are counted and skipped.
pub fn delete_paths(paths: &[PathBuf]) -> CleanReport {
    let mut report = CleanReport::default();
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for path in paths {
        // Symlinks are removed as links, never followed.
        match fs::symlink_metadata(path) {
            Ok(metadata) if metadata.is_dir() => dirs.push(path),
            Ok(_) => files.push(path),
            Err(_) => {}
        }
    }

    for file in files {
        match fs::remove_file(file) {
            Ok(()) => report.files_removed += 1,
            Err(err) => {
                debug!(path = %file.display(), %err, "failed to delete file");
                report.failures += 1;
            }
        }
    }

    order_deepest_first(&mut dirs);
    for dir in dirs {
        if !fs::symlink_metadata(dir).is_ok_and(|m| m.is_dir()) {
            continue;
        }
        match fs::remove_dir_all(dir) {
            Ok(()) => report.dirs_removed += 1,
            Err(err) => {
                debug!(path = %dir.display(), %err, "failed to delete directory");
                report.failures += 1;
            }
        }
    }

    info!(
        files = report.files_removed,
        dirs = report.dirs_removed,
        failures = report.failures,
        "deletion pass finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn size_counts_only_regular_files() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        let mut f1 = File::create(root.join("one.bin"))?;
        f1.write_all(&[0u8; 100])?;
        let mut f2 = File::create(root.join("two.bin"))?;
        f2.write_all(&[0u8; 250])?;
        fs::create_dir(root.join("folder"))?;

        let paths = vec![
            root.join("one.bin"),
            root.join("two.bin"),
            root.join("folder"),
            root.join("missing.bin"),
        ];
        assert_eq!(total_size(&paths), 350);

        let calls = std::sync::atomic::AtomicUsize::new(0);
        let cb = || {
            calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        };
        let items = sized_items(&paths, Some(&cb));
        assert_eq!(items[0].size, 250);
        assert_eq!(items[1].size, 100);
        assert_eq!(calls.into_inner(), 4);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_size_to_zero_and_delete_as_links() -> Result<()> {
        let dir = tempdir()?;
        let outside = dir.path().join("outside.bin");
        let mut target = File::create(&outside)?;
        target.write_all(&[0u8; 1000])?;
        let cache = dir.path().join("Cache");
        fs::create_dir(&cache)?;
        let link = cache.join("link");
        std::os::unix::fs::symlink(&outside, &link)?;

        let listed = crate::scanner::rules::enumerate(
            &cache,
            crate::scanner::rules::SearchMode::WalkFiles,
        );
        assert_eq!(listed, vec![link.clone()]);
        assert_eq!(total_size(&listed), 0);

        let report = delete_paths(&listed);
        assert_eq!(report.files_removed, 1);
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(outside.exists());
        Ok(())
    }

    #[test]
    fn empty_list_sizes_to_zero() {
        assert_eq!(total_size(&[]), 0);
        assert_eq!(delete_paths(&[]), CleanReport::default());
    }

    #[test]
    fn children_are_ordered_before_parents() {
        // A short path with one long component must still come after its
        // deeper but shorter-named children.
        let parent = PathBuf::from("/r/a_very_long_directory_name_that_is_long");
        let child = parent.join("b");
        let grandchild = child.join("c");
        let unrelated = PathBuf::from("/r/x/y/z/w");

        let mut order = vec![
            parent.clone(),
            grandchild.clone(),
            unrelated.clone(),
            child.clone(),
        ];
        order_deepest_first(&mut order);

        let index = |p: &PathBuf| order.iter().position(|o| o == p);
        assert!(index(&grandchild) < index(&child));
        assert!(index(&child) < index(&parent));
        assert!(index(&unrelated) < index(&parent));
    }

    #[test]
    fn deletes_nested_tree_deepest_first() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("Cache");
        let l1 = root.join("l1");
        let l2 = l1.join("l2");
        let l3 = l2.join("l3");
        fs::create_dir_all(&l3)?;
        File::create(l3.join("deep.dat"))?;
        File::create(l1.join("mid.dat"))?;
        File::create(root.join("top.dat"))?;

        let paths = vec![
            root.join("top.dat"),
            l1.join("mid.dat"),
            l3.join("deep.dat"),
            l1.clone(),
            l3.clone(),
            l2.clone(),
        ];
        let report = delete_paths(&paths);

        assert_eq!(report.files_removed, 3);
        assert_eq!(report.dirs_removed, 3);
        assert_eq!(report.failures, 0);
        assert!(!l1.exists());
        // The walk root itself was not listed, so it stays.
        assert!(root.exists());
        Ok(())
    }

    #[test]
    fn already_removed_directories_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let parent = dir.path().join("p");
        let child = parent.join("c");
        fs::create_dir_all(&child)?;

        // Listed twice and nested: the parent's recursive removal must not
        // turn the duplicate into a failure.
        let report = delete_paths(&[parent.clone(), child.clone(), parent.clone()]);

        assert_eq!(report.failures, 0);
        assert!(!parent.exists());
        Ok(())
    }
}
