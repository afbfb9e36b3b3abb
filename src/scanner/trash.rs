//! The system trash (recycle bin).
//!
//! Listing goes through [`ShellEnumerator`] so the traversal can be exercised
//! against a fake; emptying uses the platform trash API where one exists.

use crate::cleaner;
use crate::errors::ScanError;
use crate::model::{CategoryType, CleanReport, ScanResult};
use crate::scanner::Scanner;
use std::fs;
use std::path::{Path, PathBuf};
use sysinfo::Disks;
use tracing::{debug, info, warn};

/// One item as the shell reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellEntry {
    pub path: PathBuf,
    /// The shell considers this a folder. Archives can claim this too.
    pub is_container: bool,
}

pub trait ShellEnumerator {
    fn list_top_level_entries(&self) -> Result<Vec<ShellEntry>, ScanError>;
    fn list_children(&self, entry: &ShellEntry) -> Result<Vec<ShellEntry>, ScanError>;
}

/// How [`empty`] behaves. Emptying is always silent: no sound, no prompt and
/// no progress window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmptyOptions {
    /// Only purge items that were trashed from under this root.
    pub drive_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrashCapacity {
    pub bytes_used: u64,
    pub item_count: usize,
}

fn read_entries(dir: &Path) -> Result<Vec<ShellEntry>, ScanError> {
    let read_dir = fs::read_dir(dir).map_err(|e| ScanError::io(dir, e))?;
    let mut entries: Vec<ShellEntry> = read_dir
        .filter_map(Result::ok)
        .map(|e| ShellEntry {
            is_container: e.file_type().is_ok_and(|t| t.is_dir()),
            path: e.path(),
        })
        .collect();
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

/// Bookkeeping files the recycle bin keeps next to the deleted items.
#[cfg(target_os = "windows")]
fn is_trashed_item(entry: &ShellEntry) -> bool {
    entry.path.file_name().is_some_and(|name| {
        let name = name.to_string_lossy();
        !name.starts_with("$I") && !name.eq_ignore_ascii_case("desktop.ini")
    })
}

#[cfg(not(target_os = "windows"))]
fn is_trashed_item(_entry: &ShellEntry) -> bool {
    true
}

/// Trash folders one mounted volume may hold for `owner`.
#[cfg(target_os = "windows")]
fn volume_trash_roots(mount: &Path, _owner: &str) -> Vec<PathBuf> {
    // One folder per user SID.
    read_entries(&mount.join(crate::constants::RECYCLE_BIN_DIR))
        .map(|entries| {
            entries
                .into_iter()
                .filter(|e| e.is_container)
                .map(|e| e.path)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(target_os = "macos")]
fn volume_trash_roots(mount: &Path, owner: &str) -> Vec<PathBuf> {
    vec![mount.join(".Trashes").join(owner)]
}

/// Both freedesktop layouts: the shared `.Trash/<uid>` and the per-user
/// `.Trash-<uid>`.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn volume_trash_roots(mount: &Path, owner: &str) -> Vec<PathBuf> {
    vec![
        mount.join(".Trash").join(owner).join("files"),
        mount.join(format!(".Trash-{owner}")).join("files"),
    ]
}

/// The user id the per-volume trash folders are keyed by.
#[cfg(unix)]
fn current_owner() -> String {
    use std::os::unix::fs::MetadataExt;

    dirs::home_dir()
        .and_then(|home| fs::metadata(home).ok())
        .map(|metadata| metadata.uid().to_string())
        .unwrap_or_default()
}

#[cfg(not(unix))]
fn current_owner() -> String {
    String::new()
}

#[cfg(not(target_os = "windows"))]
fn home_trash() -> Vec<PathBuf> {
    crate::model::SpecialFolders::detect()
        .resolve(crate::constants::TRASH_FILES)
        .into_iter()
        .collect()
}

#[cfg(target_os = "windows")]
fn home_trash() -> Vec<PathBuf> {
    Vec::new()
}

/// Reads the trash straight from the folders the platform keeps it in.
#[derive(Debug, Clone, Default)]
pub struct TrashFolderEnumerator {
    roots: Vec<PathBuf>,
}

impl TrashFolderEnumerator {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// The home trash plus the trash folder of every mounted volume.
    pub fn detect() -> Self {
        let disks = Disks::new_with_refreshed_list();
        let mounts: Vec<PathBuf> = disks
            .list()
            .iter()
            .map(|disk| disk.mount_point().to_path_buf())
            .collect();
        Self::from_volumes(home_trash(), &mounts, &current_owner())
    }

    /// `primary` roots are kept as given; volume roots only when they exist.
    fn from_volumes(primary: Vec<PathBuf>, mounts: &[PathBuf], owner: &str) -> Self {
        let mut roots = primary;
        if cfg!(unix) && owner.is_empty() {
            return Self::new(roots);
        }
        for mount in mounts {
            for root in volume_trash_roots(mount, owner) {
                if root.is_dir() && !roots.contains(&root) {
                    roots.push(root);
                }
            }
        }
        debug!(count = roots.len(), "trash roots detected");
        Self::new(roots)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ShellEnumerator for TrashFolderEnumerator {
    fn list_top_level_entries(&self) -> Result<Vec<ShellEntry>, ScanError> {
        let mut entries = Vec::new();
        for root in &self.roots {
            match read_entries(root) {
                Ok(found) => entries.extend(found.into_iter().filter(is_trashed_item)),
                Err(err) => debug!(%err, "trash root skipped"),
            }
        }
        Ok(entries)
    }

    fn list_children(&self, entry: &ShellEntry) -> Result<Vec<ShellEntry>, ScanError> {
        read_entries(&entry.path)
    }
}

/// Children first, then the entry. Only descends into entries that are real
/// directories on disk, whatever the shell claims.
fn collect_entry(enumerator: &dyn ShellEnumerator, entry: &ShellEntry, out: &mut Vec<PathBuf>) {
    if entry.path.as_os_str().is_empty() {
        return;
    }
    if entry.is_container && entry.path.is_dir() {
        match enumerator.list_children(entry) {
            Ok(children) => {
                for child in &children {
                    collect_entry(enumerator, child, out);
                }
            }
            Err(err) => debug!(%err, "trash folder not expanded"),
        }
    }
    out.push(entry.path.clone());
}

pub fn file_list_with(enumerator: &dyn ShellEnumerator) -> Vec<PathBuf> {
    let top = match enumerator.list_top_level_entries() {
        Ok(top) => top,
        Err(err) => {
            warn!(%err, "trash could not be listed");
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for entry in &top {
        collect_entry(enumerator, entry, &mut out);
    }
    out
}

pub fn file_list() -> Vec<PathBuf> {
    file_list_with(&TrashFolderEnumerator::detect())
}

pub fn capacity_with(enumerator: &dyn ShellEnumerator) -> TrashCapacity {
    let list = file_list_with(enumerator);
    TrashCapacity {
        bytes_used: cleaner::total_size(&list),
        item_count: list.len(),
    }
}

pub fn capacity() -> TrashCapacity {
    capacity_with(&TrashFolderEnumerator::detect())
}

#[cfg(any(
    target_os = "windows",
    all(
        unix,
        not(target_os = "macos"),
        not(target_os = "ios"),
        not(target_os = "android")
    )
))]
fn purge(drive_root: Option<&Path>) -> Result<usize, ScanError> {
    let items = trash::os_limited::list().map_err(|e| ScanError::Trash(e.to_string()))?;
    let items: Vec<trash::TrashItem> = items
        .into_iter()
        .filter(|item| drive_root.is_none_or(|root| item.original_parent.starts_with(root)))
        .collect();
    let count = items.len();
    if count > 0 {
        trash::os_limited::purge_all(items).map_err(|e| ScanError::Trash(e.to_string()))?;
    }
    Ok(count)
}

/// No purge API here; the trash folder is deleted through the regular pass.
#[cfg(not(any(
    target_os = "windows",
    all(
        unix,
        not(target_os = "macos"),
        not(target_os = "ios"),
        not(target_os = "android")
    )
)))]
fn purge(drive_root: Option<&Path>) -> Result<usize, ScanError> {
    let paths: Vec<PathBuf> = file_list()
        .into_iter()
        .filter(|p| drive_root.is_none_or(|root| p.starts_with(root)))
        .collect();
    let report = cleaner::delete_paths(&paths);
    if report.failures > 0 {
        return Err(ScanError::Trash(format!(
            "{} items could not be removed",
            report.failures
        )));
    }
    Ok(report.files_removed + report.dirs_removed)
}

/// Permanently empties the trash. An already empty trash counts as success.
pub fn empty(options: &EmptyOptions) -> bool {
    match purge(options.drive_root.as_deref()) {
        Ok(count) => {
            info!(count, "trash emptied");
            true
        }
        Err(err) => {
            warn!(%err, "failed to empty trash");
            false
        }
    }
}

pub struct TrashScanner {
    pub enumerator: TrashFolderEnumerator,
}

impl TrashScanner {
    pub fn detect() -> Self {
        Self {
            enumerator: TrashFolderEnumerator::detect(),
        }
    }
}

impl Scanner for TrashScanner {
    fn category(&self) -> CategoryType {
        CategoryType::Trash
    }

    fn description(&self) -> String {
        "Items in the system trash.".to_string()
    }

    fn scan(&self, progress_cb: Option<&(dyn Fn() + Sync)>) -> ScanResult {
        let paths = file_list_with(&self.enumerator);
        let items = cleaner::sized_items(&paths, progress_cb);

        ScanResult {
            category: self.category(),
            total_size: items.iter().map(|i| i.size).sum(),
            items,
            is_selected: false,
            description: self.description(),
            root_path: self.enumerator.roots().first().cloned().unwrap_or_default(),
        }
    }

    fn clean(&self, result: &ScanResult) -> CleanReport {
        let dirs = result.items.iter().filter(|i| i.path.is_dir()).count();
        let files = result.items.len() - dirs;
        if empty(&EmptyOptions::default()) {
            CleanReport {
                files_removed: files,
                dirs_removed: dirs,
                failures: 0,
            }
        } else {
            CleanReport {
                failures: result.items.len(),
                ..CleanReport::default()
            }
        }
    }
}
