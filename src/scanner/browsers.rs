use crate::cleaner;
use crate::constants::{
    BASE_VAR, CHROME_USER_DATA, DEFAULT_PROFILE, EDGE_USER_DATA, FIREFOX_CACHE_PROFILES,
    FIREFOX_CACHE_SUBDIRS, FIREFOX_PROFILES_DIR, FIREFOX_ROOT, PROFILE_VAR,
};
use crate::model::{BrowserKind, CategoryType, CleanReport, ScanResult, SpecialFolders};
use crate::scanner::Scanner;
use crate::scanner::rules::{PathRule, SearchMode, enumerate};
use crate::scanner::walk::{WalkMode, walk};
use crate::template::{self, VariableSet};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const EDGE_RULES: &[PathRule] = &[
    PathRule::new(SearchMode::File, "$$profile$$/Network Persistent State"),
    PathRule::new(SearchMode::WalkAll, "$$base$$/ShaderCache"),
    PathRule::new(SearchMode::WalkAll, "$$profile$$/File System"),
    PathRule::new(SearchMode::WalkAll, "$$profile$$/Service Worker"),
    PathRule::new(SearchMode::WalkAll, "$$profile$$/Storage/ext/*/*def/GPUCache"),
    PathRule::new(SearchMode::WalkFiles, "$$profile$$/GPUCache/"),
    PathRule::new(SearchMode::Glob, "$$base$$/B*.tmp"),
    PathRule::new(SearchMode::WalkAll, "$$profile$$/Default/Application Cache/"),
    PathRule::new(SearchMode::WalkFiles, "$$profile$$/Cache/"),
    PathRule::new(SearchMode::WalkFiles, "$$profile$$/Media Cache/"),
];

const CHROME_RULES: &[PathRule] = &[
    PathRule::new(SearchMode::File, "$$base$$/Safe Browsing Channel IDs-journal"),
    PathRule::new(SearchMode::File, "$$profile$$/Network Persistent State"),
    PathRule::new(SearchMode::File, "$$profile$$/Network/Network Persistent State"),
    PathRule::new(SearchMode::WalkAll, "$$base$$/ShaderCache"),
    PathRule::new(SearchMode::WalkAll, "$$profile$$/File System"),
    PathRule::new(
        SearchMode::WalkAll,
        "$$profile$$/Pepper Data/Shockwave Flash/CacheWritableAdobeRoot/",
    ),
    PathRule::new(SearchMode::WalkAll, "$$profile$$/Service Worker"),
    PathRule::new(SearchMode::WalkAll, "$$profile$$/Storage/ext/*/*def/GPUCache"),
    PathRule::new(SearchMode::WalkFiles, "$$profile$$/GPUCache/"),
    PathRule::new(SearchMode::Glob, "$$base$$/B*.tmp"),
    PathRule::new(SearchMode::WalkAll, "$$profile$$/Default/Application Cache/"),
    PathRule::new(SearchMode::WalkFiles, "$$profile$$/Cache/"),
    PathRule::new(SearchMode::WalkFiles, "$$profile$$/Code Cache/"),
    PathRule::new(SearchMode::WalkFiles, "$$profile$$/Media Cache/"),
];

const FIREFOX_RULES: &[PathRule] = &[PathRule::new(
    SearchMode::File,
    "$$profile$$/netpredictions.sqlite",
)];

pub fn rules(kind: BrowserKind) -> &'static [PathRule] {
    match kind {
        BrowserKind::Edge => EDGE_RULES,
        BrowserKind::Chrome => CHROME_RULES,
        BrowserKind::Firefox => FIREFOX_RULES,
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Chromium layout: a user-data root with the `Default` profile inside it.
fn chromium_variables(base: PathBuf) -> VariableSet {
    let profile = base.join(DEFAULT_PROFILE);
    VariableSet::new()
        .with(BASE_VAR, vec![path_string(&base)])
        .with(PROFILE_VAR, vec![path_string(&profile)])
}

fn list_subdirs(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(path = %dir.display(), %err, "cannot list profiles");
            return Vec::new();
        }
    };
    let mut subdirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    subdirs.sort();
    subdirs
}

/// Installed Firefox profiles. Where profiles share the Firefox root with other
/// folders, only `<salt>.<name>` directories count.
fn firefox_profiles(base: &Path) -> Vec<PathBuf> {
    let root = if FIREFOX_PROFILES_DIR.is_empty() {
        base.to_path_buf()
    } else {
        base.join(FIREFOX_PROFILES_DIR)
    };
    let mut profiles = list_subdirs(&root);
    if FIREFOX_PROFILES_DIR.is_empty() {
        profiles.retain(|p| {
            p.file_name()
                .is_some_and(|name| name.to_string_lossy().contains('.'))
        });
    }
    profiles
}

fn firefox_variables(base: PathBuf) -> VariableSet {
    let mut profiles: Vec<String> = firefox_profiles(&base)
        .iter()
        .map(|p| path_string(p))
        .collect();
    if profiles.is_empty() {
        let root = if FIREFOX_PROFILES_DIR.is_empty() {
            base.clone()
        } else {
            base.join(FIREFOX_PROFILES_DIR)
        };
        profiles.push(path_string(&root.join("*")));
    }
    VariableSet::new()
        .with(BASE_VAR, vec![path_string(&base)])
        .with(PROFILE_VAR, profiles)
}

/// The browser's template variables, or `None` when the platform cannot say
/// where the browser lives.
pub fn variables(kind: BrowserKind, folders: &SpecialFolders) -> Option<VariableSet> {
    match kind {
        BrowserKind::Edge => folders.resolve(EDGE_USER_DATA).map(chromium_variables),
        BrowserKind::Chrome => folders.resolve(CHROME_USER_DATA).map(chromium_variables),
        BrowserKind::Firefox => folders.resolve(FIREFOX_ROOT).map(firefox_variables),
    }
}

/// Firefox keeps its disk caches in a separate per-profile tree; those folders
/// are walked directly without any templating.
fn firefox_cache_dirs(folders: &SpecialFolders) -> Vec<PathBuf> {
    let Some(cache_profiles) = folders.resolve(FIREFOX_CACHE_PROFILES) else {
        return Vec::new();
    };
    if !cache_profiles.is_dir() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for profile in list_subdirs(&cache_profiles) {
        for sub in FIREFOX_CACHE_SUBDIRS {
            let cache = profile.join(sub);
            if !cache.is_dir() {
                continue;
            }
            match walk(&cache, WalkMode::FilesAndDirs) {
                Ok(mut paths) => found.append(&mut paths),
                Err(err) => debug!(%err, "firefox cache skipped"),
            }
        }
    }
    found
}

/// Resolves every rule against `vars` and unions the results.
pub fn resolve_rules(rules: &[PathRule], vars: &VariableSet) -> BTreeSet<PathBuf> {
    let mut paths = BTreeSet::new();
    for rule in rules {
        for resolved in template::resolve(rule.template, vars) {
            let found = enumerate(&resolved, rule.mode);
            debug!(
                mode = %rule.mode,
                path = %resolved.display(),
                count = found.len(),
                "rule enumerated"
            );
            paths.extend(found);
        }
    }
    paths
}

/// All cache paths for `kind` under the given special folders, de-duplicated.
pub fn cache_paths_with(kind: BrowserKind, folders: &SpecialFolders) -> Vec<PathBuf> {
    let mut paths = BTreeSet::new();

    if kind == BrowserKind::Firefox {
        paths.extend(firefox_cache_dirs(folders));
    }

    match variables(kind, folders) {
        Some(vars) => paths.extend(resolve_rules(rules(kind), &vars)),
        None => debug!(browser = %kind, "no install location on this platform"),
    }

    paths.into_iter().collect()
}

pub fn get_cache_paths(kind: BrowserKind) -> Vec<PathBuf> {
    cache_paths_with(kind, &SpecialFolders::detect())
}

pub fn get_cache_size(kind: BrowserKind) -> u64 {
    cleaner::total_size(&get_cache_paths(kind))
}

/// Deletes the cache path set. Failures are skipped and counted.
pub fn clean_cache(kind: BrowserKind) -> CleanReport {
    cleaner::delete_paths(&get_cache_paths(kind))
}

pub struct BrowserScanner {
    pub kind: BrowserKind,
    pub folders: SpecialFolders,
}

impl BrowserScanner {
    pub fn new(kind: BrowserKind) -> Self {
        Self {
            kind,
            folders: SpecialFolders::detect(),
        }
    }
}

impl Scanner for BrowserScanner {
    fn category(&self) -> CategoryType {
        CategoryType::BrowserCache(self.kind)
    }

    fn description(&self) -> String {
        format!("{} cache files, GPU and shader caches.", self.kind)
    }

    fn scan(&self, progress_cb: Option<&(dyn Fn() + Sync)>) -> ScanResult {
        let paths = cache_paths_with(self.kind, &self.folders);
        let items = cleaner::sized_items(&paths, progress_cb);

        let root_path = variables(self.kind, &self.folders)
            .and_then(|vars| vars.get(BASE_VAR).and_then(|v| v.first().cloned()))
            .map(PathBuf::from)
            .unwrap_or_default();

        ScanResult {
            category: self.category(),
            total_size: items.iter().map(|i| i.size).sum(),
            items,
            is_selected: false,
            description: self.description(),
            root_path,
        }
    }

    fn clean(&self, result: &ScanResult) -> CleanReport {
        let paths: Vec<PathBuf> = result.items.iter().map(|i| i.path.clone()).collect();
        cleaner::delete_paths(&paths)
    }
}
