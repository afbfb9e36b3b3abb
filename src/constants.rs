use crate::model::Folder;

pub const PROFILE_VAR: &str = "profile";
pub const BASE_VAR: &str = "base";
pub const DEFAULT_PROFILE: &str = "Default";

#[cfg(target_os = "windows")]
pub const EDGE_USER_DATA: (Folder, &str) = (Folder::LocalData, "Microsoft/Edge/User Data");
#[cfg(target_os = "windows")]
pub const CHROME_USER_DATA: (Folder, &str) = (Folder::LocalData, "Google/Chrome/User Data");
#[cfg(target_os = "windows")]
pub const FIREFOX_ROOT: (Folder, &str) = (Folder::RoamingData, "Mozilla/Firefox");
#[cfg(target_os = "windows")]
pub const FIREFOX_PROFILES_DIR: &str = "Profiles";
#[cfg(target_os = "windows")]
pub const FIREFOX_CACHE_PROFILES: (Folder, &str) = (Folder::LocalData, "Mozilla/Firefox/Profiles");

#[cfg(target_os = "macos")]
pub const EDGE_USER_DATA: (Folder, &str) = (Folder::RoamingData, "Microsoft Edge");
#[cfg(target_os = "macos")]
pub const CHROME_USER_DATA: (Folder, &str) = (Folder::RoamingData, "Google/Chrome");
#[cfg(target_os = "macos")]
pub const FIREFOX_ROOT: (Folder, &str) = (Folder::RoamingData, "Firefox");
#[cfg(target_os = "macos")]
pub const FIREFOX_PROFILES_DIR: &str = "Profiles";
#[cfg(target_os = "macos")]
pub const FIREFOX_CACHE_PROFILES: (Folder, &str) = (Folder::Cache, "Firefox/Profiles");

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const EDGE_USER_DATA: (Folder, &str) = (Folder::Config, "microsoft-edge");
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const CHROME_USER_DATA: (Folder, &str) = (Folder::Config, "google-chrome");
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const FIREFOX_ROOT: (Folder, &str) = (Folder::Home, ".mozilla/firefox");
// Linux keeps profiles directly under the Firefox root.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const FIREFOX_PROFILES_DIR: &str = "";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const FIREFOX_CACHE_PROFILES: (Folder, &str) = (Folder::Cache, "mozilla/firefox");

/// Per-profile cache folders Firefox keeps outside the roaming profile.
pub const FIREFOX_CACHE_SUBDIRS: [&str; 3] = ["cache2", "jumpListCache", "OfflineCache"];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const TRASH_FILES: (Folder, &str) = (Folder::LocalData, "Trash/files");
#[cfg(target_os = "macos")]
pub const TRASH_FILES: (Folder, &str) = (Folder::Home, ".Trash");
#[cfg(target_os = "windows")]
pub const RECYCLE_BIN_DIR: &str = "$Recycle.Bin";
