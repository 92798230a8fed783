//! Error types for the store crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from history export and store maintenance.
///
/// Day-to-day reads never fail: absent or corrupt persisted entries are
/// recovered as empty. Errors here come from the export path, which talks
/// to the real filesystem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The basin has no history entries to export.
    #[error("no history data available for export")]
    NoData,

    /// Failed to create the export directory.
    #[error("failed to create export directory {path}: {source}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV serialization or file write failed.
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the export file failed.
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the store's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
