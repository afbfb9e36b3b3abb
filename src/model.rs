use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum BrowserKind {
    Edge,
    Chrome,
    Firefox,
}

impl BrowserKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Edge => "Microsoft Edge",
            Self::Chrome => "Google Chrome",
            Self::Firefox => "Mozilla Firefox",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryType {
    BrowserCache(BrowserKind),
    Trash,
}

impl CategoryType {
    pub const ALL: [Self; 4] = [
        Self::BrowserCache(BrowserKind::Edge),
        Self::BrowserCache(BrowserKind::Chrome),
        Self::BrowserCache(BrowserKind::Firefox),
        Self::Trash,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::BrowserCache(BrowserKind::Edge) => "Edge Cache",
            Self::BrowserCache(BrowserKind::Chrome) => "Chrome Cache",
            Self::BrowserCache(BrowserKind::Firefox) => "Firefox Cache",
            Self::Trash => "Trash",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            Self::BrowserCache(BrowserKind::Edge) => "Edge",
            Self::BrowserCache(BrowserKind::Chrome) => "Chrome",
            Self::BrowserCache(BrowserKind::Firefox) => "Firefox",
            Self::Trash => "Trash",
        }
    }
}

/// Platform folders a browser installation hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    LocalData,
    RoamingData,
    Config,
    Cache,
    Home,
}

/// Snapshot of the platform's special folders. Any of them may be missing.
#[derive(Debug, Clone, Default)]
pub struct SpecialFolders {
    pub local_data: Option<PathBuf>,
    pub roaming_data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub cache: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl SpecialFolders {
    pub fn detect() -> Self {
        Self {
            local_data: dirs::data_local_dir(),
            roaming_data: dirs::data_dir(),
            config: dirs::config_dir(),
            cache: dirs::cache_dir(),
            home: dirs::home_dir(),
        }
    }

    /// Every folder rooted at `root`, the way a sandboxed fixture lays them out.
    #[cfg(test)]
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            local_data: Some(root.join("local")),
            roaming_data: Some(root.join("roaming")),
            config: Some(root.join("config")),
            cache: Some(root.join("cache")),
            home: Some(root.join("home")),
        }
    }

    pub fn get(&self, folder: Folder) -> Option<&Path> {
        match folder {
            Folder::LocalData => self.local_data.as_deref(),
            Folder::RoamingData => self.roaming_data.as_deref(),
            Folder::Config => self.config.as_deref(),
            Folder::Cache => self.cache.as_deref(),
            Folder::Home => self.home.as_deref(),
        }
        .filter(|p| !p.as_os_str().is_empty())
    }

    /// Resolves a `/`-separated path relative to one of the special folders.
    pub fn resolve(&self, location: (Folder, &str)) -> Option<PathBuf> {
        let (folder, relative) = location;
        let base = self.get(folder)?;
        Some(
            relative
                .split('/')
                .filter(|segment| !segment.is_empty())
                .fold(base.to_path_buf(), |path, segment| path.join(segment)),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ScannedItem {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct ScanResult {
    pub category: CategoryType,
    pub total_size: u64,
    pub items: Vec<ScannedItem>,
    pub is_selected: bool,
    pub description: String,
    pub root_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub category: CategoryType,
    pub items_count: usize,
    pub status: String,
}

/// Outcome of a best-effort deletion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub files_removed: usize,
    pub dirs_removed: usize,
    pub failures: usize,
}

impl CleanReport {
    pub fn merge(&mut self, other: Self) {
        self.files_removed += other.files_removed;
        self.dirs_removed += other.dirs_removed;
        self.failures += other.failures;
    }
}
