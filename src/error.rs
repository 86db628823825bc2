//! Error types for the endpoint tester core
//!
//! Each failure the caller has to react to differently gets its own variant.
//! A missing client binary and a nonzero exit code are *not* errors; they are
//! carried in [`RawResult`](crate::models::RawResult).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// A header line without a colon
    #[error("Invalid header line: {line}")]
    HeaderParse { line: String },

    /// Form input rejected before it became an endpoint
    #[error("{0}")]
    Validation(String),

    /// Index does not address a stored endpoint
    #[error("Index {index} out of range (collection has {len} endpoints)")]
    OutOfRange { index: usize, len: usize },

    /// No endpoint with the requested name
    #[error("No endpoint named '{0}'")]
    NotFound(String),

    /// Filesystem failure while persisting
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failure while persisting
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors the caller fixes by correcting input (parse and validation kinds)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::HeaderParse { .. }
                | Error::Validation(_)
                | Error::OutOfRange { .. }
                | Error::NotFound(_)
        )
    }
}
