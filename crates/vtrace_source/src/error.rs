//! Errors raised while loading report files.

use std::path::PathBuf;

/// Errors that can occur when loading a report file into the [`SourceDb`](crate::SourceDb).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("source file not found: {}", path.display())]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Returns the path of the file that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::NotFound { path } | LoadError::Io { path, .. } => path,
        }
    }
}
