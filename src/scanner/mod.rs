pub mod browsers;
pub mod glob;
pub mod rules;
pub mod trash;
pub mod walk;

use crate::model::{CategoryType, CleanReport, ScanResult};

pub trait Scanner: Send + Sync {
    fn category(&self) -> CategoryType;
    fn description(&self) -> String;
    fn scan(&self, progress_cb: Option<&(dyn Fn() + Sync)>) -> ScanResult;
    /// Removes what `result` found. Best-effort; the report counts failures.
    fn clean(&self, result: &ScanResult) -> CleanReport;
}

pub fn scanner_for(category: CategoryType) -> Box<dyn Scanner> {
    match category {
        CategoryType::BrowserCache(kind) => Box::new(browsers::BrowserScanner::new(kind)),
        CategoryType::Trash => Box::new(trash::TrashScanner::detect()),
    }
}

pub fn get_all_scanners() -> Vec<Box<dyn Scanner>> {
    CategoryType::ALL.into_iter().map(scanner_for).collect()
}

/// Scans one category on the calling thread.
pub fn scan_category(category: CategoryType, progress_cb: Option<&(dyn Fn() + Sync)>) -> ScanResult {
    scanner_for(category).scan(progress_cb)
}
