use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a single file contributed nothing to the statistics.
/// None of these stop a scan.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unsupported extension: {}", .path.display())]
    UnsupportedExtension { path: PathBuf },
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("not valid UTF-8: {}", .path.display())]
    Undecodable { path: PathBuf },
}

impl SkipReason {
    /// Unsupported files are out of scope; only read and decode failures are
    /// worth reporting to the user.
    pub fn is_failure(&self) -> bool {
        !matches!(self, SkipReason::UnsupportedExtension { .. })
    }
}

/// Conditions that end a scan early.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("Invalid filespec pattern '{spec}': {source}")]
    InvalidFilespec {
        spec: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Too many entries in directory tree (limit {0})")]
    TooManyEntries(usize),
    #[error(transparent)]
    Io(#[from] io::Error),
}
