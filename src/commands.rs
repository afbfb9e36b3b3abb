use crate::model::{BrowserKind, ScanResult};
use crate::scanner::{self, browsers, trash};
use anyhow::{Result, bail};
use clap::Subcommand;
use humansize::{BINARY, format_size};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Subcommand)]
pub enum Command {
    /// Print every cache path found for a browser
    Paths { browser: BrowserKind },

    /// Print the bytes a browser's cache occupies (all categories when omitted)
    Size {
        browser: Option<BrowserKind>,

        /// Print raw byte counts instead of human readable sizes
        #[arg(long)]
        bytes: bool,
    },

    /// Permanently delete a browser's cache
    Clean { browser: BrowserKind },

    /// Inspect or empty the system trash
    Trash {
        #[command(subcommand)]
        action: TrashAction,
    },
}

#[derive(Subcommand)]
pub enum TrashAction {
    /// List trashed items, children before their folders
    List,

    /// Print the trash's byte total and item count
    Size {
        #[arg(long)]
        bytes: bool,
    },

    /// Permanently empty the trash without prompting
    Empty {
        /// Only remove items that were trashed from under this root
        #[arg(long)]
        drive: Option<PathBuf>,
    },
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn format_bytes(size: u64, raw: bool) -> String {
    if raw {
        size.to_string()
    } else {
        format_size(size, BINARY)
    }
}

fn size_line(result: &ScanResult, raw: bool) -> String {
    format!(
        "{:<16} {:>12}  ({} entries)",
        result.category.name(),
        format_bytes(result.total_size, raw),
        result.items.len()
    )
}

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Paths { browser } => {
            for path in browsers::get_cache_paths(browser) {
                println!("{}", path.display());
            }
        }
        Command::Size {
            browser: Some(browser),
            bytes,
        } => {
            let pb = spinner(&format!("Sizing {browser} cache..."));
            let size = browsers::get_cache_size(browser);
            pb.finish_and_clear();
            println!("{}", format_bytes(size, bytes));
        }
        Command::Size {
            browser: None,
            bytes,
        } => {
            let pb = spinner("Scanning browser caches and trash...");
            let results: Vec<ScanResult> = scanner::get_all_scanners()
                .par_iter()
                .map(|s| s.scan(None))
                .collect();
            pb.finish_and_clear();

            for result in &results {
                println!("{}", size_line(result, bytes));
            }
            let total: u64 = results.iter().map(|r| r.total_size).sum();
            println!("{:<16} {:>12}", "Total", format_bytes(total, bytes));
        }
        Command::Clean { browser } => {
            let pb = spinner(&format!("Cleaning {browser} cache..."));
            let report = browsers::clean_cache(browser);
            pb.finish_and_clear();
            println!(
                "Removed {} files and {} folders ({} skipped)",
                report.files_removed, report.dirs_removed, report.failures
            );
        }
        Command::Trash { action } => run_trash(action)?,
    }
    Ok(())
}

fn run_trash(action: TrashAction) -> Result<()> {
    match action {
        TrashAction::List => {
            for path in trash::file_list() {
                println!("{}", path.display());
            }
        }
        TrashAction::Size { bytes } => {
            let capacity = trash::capacity();
            println!(
                "{} in {} items",
                format_bytes(capacity.bytes_used, bytes),
                capacity.item_count
            );
        }
        TrashAction::Empty { drive } => {
            if !trash::empty(&trash::EmptyOptions { drive_root: drive }) {
                bail!("failed to empty the trash");
            }
            println!("Trash emptied");
        }
    }
    Ok(())
}
