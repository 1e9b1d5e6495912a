//! Error types for the conversation viewer core.
//!
//! Failures are contained at the smallest unit that can absorb them: a malformed line is
//! dropped by the scanner, an unreadable or oversized file is skipped by the catalog, and an
//! unreadable project directory contributes nothing to a listing. Only the operations that act
//! on a single caller-named resource (`read_conversation`, `search`) surface a [`ViewerError`]
//! to the transport.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the catalog, scanner and search engine.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The requested project or conversation does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The file is larger than the ceiling configured for this kind of read.
    #[error("file too large: {} ({size} bytes, max {limit} bytes)", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Caller-supplied input was rejected before any processing.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Permission, not-found or transient read failure on one file or directory.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bounded scan pool could not be created.
    #[error("failed to build scan thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ViewerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            return ViewerError::NotFound(path.display().to_string());
        }
        ViewerError::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
