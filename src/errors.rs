use std::path::PathBuf;

/// Failures from the filesystem primitives the engine is built on.
///
/// None of these escape the public operations: callers log them and treat the
/// affected branch as contributing nothing.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a directory: '{}'", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("trash operation failed: {0}")]
    Trash(String),
}

impl ScanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
