//! Application-wide error types using thiserror.

use carevis_common::CarevisError;
use std::path::PathBuf;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    /// Configuration, dataset, or rendering error.
    #[error(transparent)]
    Carevis(#[from] CarevisError),

    /// A rendered view could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// GeoJSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// Wraps an I/O error with the path being written.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result type for the dashboard application.
pub type DashboardResult<T> = Result<T, DashboardError>;
