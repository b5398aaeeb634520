//! Error types for revline.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error opening, reading, or releasing a reverse line cursor.
#[derive(Debug)]
pub enum ReaderError {
    /// The backing file does not exist. Only produced at open time.
    NotFound { path: PathBuf },

    /// Seek, read, metadata, or release failure on the byte source.
    Io {
        path: Option<PathBuf>,
        source: io::Error,
    },
}

impl ReaderError {
    pub(crate) fn io(path: Option<&PathBuf>, source: io::Error) -> Self {
        ReaderError::Io {
            path: path.cloned(),
            source,
        }
    }

    /// True if this is the open-time `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReaderError::NotFound { .. })
    }
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::NotFound { path } => write!(f, "file not found: {}", path.display()),
            ReaderError::Io {
                path: Some(path),
                source,
            } => write!(f, "I/O error on {}: {}", path.display(), source),
            ReaderError::Io { path: None, source } => write!(f, "I/O error: {}", source),
        }
    }
}

impl std::error::Error for ReaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReaderError::Io { source, .. } => Some(source),
            ReaderError::NotFound { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;
