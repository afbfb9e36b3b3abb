use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "cachesweep=debug"
        } else {
            "cachesweep=warn"
        })
    })
}

pub fn log_file_path() -> PathBuf {
    std::env::temp_dir().join("cachesweep.log")
}

/// Logs to stderr. Used by the one-shot subcommands.
pub fn init_stderr(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

/// Logs to a file in the temp directory so the alternate screen stays clean.
/// Logging is skipped if the file cannot be created.
pub fn init_file(verbose: bool) {
    let Ok(file) = File::create(log_file_path()) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .compact()
        .try_init()
        .ok();
}
