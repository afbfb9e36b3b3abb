use crate::model::{CategoryType, CleanReport, ScanProgress, ScanResult};
use crate::scanner;
use humansize::{BINARY, format_size};
use ratatui::widgets::ListState;
use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use sysinfo::Disks;
use tracing::info;

pub enum AppState {
    Browsing,
    Confirming,
    Cleaning,
    Scanning,
    Done(String),
}

pub struct App {
    pub results: Vec<ScanResult>,
    pub list_state: ListState,
    pub state: AppState,
    pub disks: Disks,
    // Channel receiver for cleaning thread results
    pub cleaning_rx: Option<mpsc::Receiver<Result<String, String>>>,
    pub scan_rx: Option<mpsc::Receiver<ScanUpdate>>,
    pub scan_progress: HashMap<CategoryType, ScanProgress>,
    pub total_categories: usize,
}

pub enum ScanUpdate {
    Progress(ScanProgress),
    Result(ScanResult),
}

fn clean_message(size: u64, report: CleanReport) -> Result<String, String> {
    let summary = format!(
        "{} files and {} folders removed",
        report.files_removed, report.dirs_removed
    );
    if report.failures == 0 {
        Ok(format!(
            "Successfully cleaned {}! ({summary})",
            format_size(size, BINARY)
        ))
    } else {
        Err(format!(
            "Cleaned with {} items left in place. ({summary})",
            report.failures
        ))
    }
}

impl App {
    pub fn new_scanning() -> Self {
        let disks = Disks::new_with_refreshed_list();
        Self {
            results: Vec::new(),
            list_state: ListState::default(),
            state: AppState::Scanning,
            disks,
            cleaning_rx: None,
            scan_rx: None,
            scan_progress: HashMap::new(),
            total_categories: 0,
        }
    }

    pub fn next(&mut self) {
        if self.results.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.results.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.results.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.results.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle(&mut self) {
        if let Some(i) = self.list_state.selected()
            && i < self.results.len()
        {
            self.results[i].is_selected = !self.results[i].is_selected;
        }
    }

    /// Selects every category, or clears the selection when all are selected.
    pub fn toggle_all(&mut self) {
        let select = self.results.iter().any(|r| !r.is_selected);
        for result in &mut self.results {
            result.is_selected = select;
        }
    }

    /// The trash is emptied as a whole, whatever the scan listed.
    pub fn trash_selected(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.is_selected && r.category == CategoryType::Trash)
    }

    pub fn total_selected_size(&self) -> u64 {
        self.results
            .iter()
            .filter(|r| r.is_selected)
            .map(|r| r.total_size)
            .sum()
    }

    pub fn clean_selected(&mut self) {
        let selected: Vec<ScanResult> = self
            .results
            .iter()
            .filter(|r| r.is_selected && !r.items.is_empty())
            .cloned()
            .collect();

        if selected.is_empty() {
            self.state = AppState::Done("Nothing selected to clean.".to_string());
            return;
        }

        self.state = AppState::Cleaning;

        let (tx, rx) = mpsc::channel();
        self.cleaning_rx = Some(rx);

        thread::spawn(move || {
            let size = selected.iter().map(|r| r.total_size).sum::<u64>();
            let mut report = CleanReport::default();
            for result in &selected {
                let category_report = scanner::scanner_for(result.category).clean(result);
                info!(category = result.category.name(), ?category_report, "category cleaned");
                report.merge(category_report);
            }
            let _ = tx.send(clean_message(size, report));
        });
    }

    pub fn check_cleaning_status(&mut self) {
        if let Some(rx) = &self.cleaning_rx
            && let Ok(result) = rx.try_recv()
        {
            match result {
                Ok(msg) => {
                    self.state = AppState::Done(msg);
                    for result in &mut self.results {
                        if result.is_selected {
                            result.is_selected = false;
                            result.items.clear();
                            result.total_size = 0;
                        }
                    }

                    // Refresh disk info after cleaning
                    self.disks.refresh(true);
                }
                Err(err_msg) => {
                    self.state = AppState::Done(err_msg);
                }
            }
            self.cleaning_rx = None;
        }
    }

    /// Drops the current results and scans every category again.
    pub fn rescan(&mut self) {
        self.results.clear();
        self.scan_progress.clear();
        self.list_state.select(None);
        self.state = AppState::Scanning;
        self.disks.refresh(true);
        self.start_scan();
    }

    /// Collects whatever the background workers have sent since the last frame.
    pub fn tick(&mut self) {
        match self.state {
            AppState::Cleaning => self.check_cleaning_status(),
            AppState::Scanning => self.check_scan_status(),
            _ => {}
        }
    }

    pub fn start_scan(&mut self) {
        let (tx, rx) = mpsc::channel();
        self.scan_rx = Some(rx);

        let categories = CategoryType::ALL;
        self.total_categories = categories.len();

        for category in categories {
            self.scan_progress.insert(
                category,
                ScanProgress {
                    category,
                    items_count: 0,
                    status: "Waiting...".to_string(),
                },
            );

            let tx_clone = tx.clone();

            thread::spawn(move || {
                let tx_progress = tx_clone.clone();
                let cb = move || {
                    let _ = tx_progress.send(ScanUpdate::Progress(ScanProgress {
                        category,
                        items_count: 1,
                        status: "Scanning...".to_string(),
                    }));
                };

                let res = scanner::scan_category(category, Some(&cb));

                let _ = tx_clone.send(ScanUpdate::Result(res));
            });
        }
    }

    pub fn check_scan_status(&mut self) {
        if let Some(rx) = &self.scan_rx {
            while let Ok(update) = rx.try_recv() {
                match update {
                    ScanUpdate::Progress(progress) => {
                        if let Some(entry) = self.scan_progress.get_mut(&progress.category) {
                            entry.items_count += progress.items_count;
                            entry.status = progress.status;
                        }
                    }
                    ScanUpdate::Result(result) => {
                        if let Some(entry) = self.scan_progress.get_mut(&result.category) {
                            entry.status = "Done".to_string();
                        }
                        self.results.push(result);
                    }
                }
            }

            if self.results.len() == self.total_categories {
                self.results.sort_by(|a, b| b.total_size.cmp(&a.total_size));

                if !self.results.is_empty() {
                    self.list_state.select(Some(0));
                }
                self.state = AppState::Browsing;
                self.scan_rx = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BrowserKind;
    use std::path::PathBuf;

    fn result(category: CategoryType, total_size: u64) -> ScanResult {
        ScanResult {
            category,
            total_size,
            items: vec![],
            is_selected: false,
            description: "Test description".to_string(),
            root_path: PathBuf::from("/tmp"),
        }
    }

    #[test]
    fn test_check_scan_status_updates() {
        let mut app = App::new_scanning();

        let category = CategoryType::BrowserCache(BrowserKind::Chrome);
        app.scan_progress.insert(
            category,
            ScanProgress {
                category,
                items_count: 0,
                status: "Waiting...".to_string(),
            },
        );
        app.total_categories = 1;

        let (tx, rx) = mpsc::channel();
        app.scan_rx = Some(rx);

        tx.send(ScanUpdate::Progress(ScanProgress {
            category,
            items_count: 5,
            status: "Scanning...".to_string(),
        }))
        .unwrap();

        app.check_scan_status();

        let progress = app
            .scan_progress
            .get(&category)
            .expect("Category should exist");
        assert_eq!(progress.items_count, 5);
        assert_eq!(progress.status, "Scanning...");
        assert!(matches!(app.state, AppState::Scanning));

        tx.send(ScanUpdate::Result(result(category, 1024))).unwrap();

        app.check_scan_status();

        let progress = app
            .scan_progress
            .get(&category)
            .expect("Category should exist");
        assert_eq!(progress.status, "Done");

        // Should transition to Browsing because results.len() (1) == total_categories (1)
        assert_eq!(app.results.len(), 1);
        assert!(matches!(app.state, AppState::Browsing));
        assert!(app.scan_rx.is_none());
    }

    #[test]
    fn selection_drives_total_and_wraps() {
        let mut app = App::new_scanning();
        app.results = vec![
            result(CategoryType::Trash, 100),
            result(CategoryType::BrowserCache(BrowserKind::Edge), 50),
        ];
        app.state = AppState::Browsing;

        app.next();
        app.toggle();
        assert_eq!(app.total_selected_size(), 100);

        app.next();
        app.toggle();
        assert_eq!(app.total_selected_size(), 150);

        app.next();
        assert_eq!(app.list_state.selected(), Some(0));
        app.previous();
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let mut app = App::new_scanning();
        app.results = vec![
            result(CategoryType::Trash, 10),
            result(CategoryType::BrowserCache(BrowserKind::Firefox), 20),
        ];
        app.results[1].is_selected = true;

        app.toggle_all();
        assert_eq!(app.total_selected_size(), 30);
        assert!(app.trash_selected());

        app.toggle_all();
        assert_eq!(app.total_selected_size(), 0);
        assert!(!app.trash_selected());
    }

    #[test]
    fn tick_outside_background_work_changes_nothing() {
        let mut app = App::new_scanning();
        app.state = AppState::Browsing;
        let (tx, rx) = mpsc::channel();
        app.scan_rx = Some(rx);
        tx.send(ScanUpdate::Result(result(CategoryType::Trash, 1)))
            .unwrap();

        app.tick();

        assert!(app.results.is_empty());
        assert!(matches!(app.state, AppState::Browsing));
    }

    #[test]
    fn cleaning_nothing_reports_done() {
        let mut app = App::new_scanning();
        app.results = vec![result(CategoryType::Trash, 0)];
        app.results[0].is_selected = true;

        app.clean_selected();

        assert!(matches!(app.state, AppState::Done(ref msg) if msg == "Nothing selected to clean."));
        assert!(app.cleaning_rx.is_none());
    }

    #[test]
    fn clean_message_flags_failures() {
        let ok = clean_message(
            2048,
            CleanReport {
                files_removed: 2,
                dirs_removed: 1,
                failures: 0,
            },
        );
        assert!(ok.is_ok_and(|m| m.contains("2 files and 1 folders")));

        let partial = clean_message(
            10,
            CleanReport {
                files_removed: 1,
                dirs_removed: 0,
                failures: 3,
            },
        );
        assert!(partial.is_err_and(|m| m.contains("3 items left")));
    }
}
