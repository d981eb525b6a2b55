use std::io;
use std::path::{Path, PathBuf};

use snafu::Snafu;
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::filesystem::{MAX_PATH_LEN, PathKind};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PathError {
    #[snafu(display("The path node has not been opened"))]
    Uninitialized,
    #[snafu(display("Path {} does not exist", path.best_effort_path_display()))]
    NotFound { path: PathBuf, source: io::Error },
    #[snafu(display(
        "Expected {} to be a {}, but it is a {}",
        path.best_effort_path_display(),
        expected,
        found
    ))]
    WrongKind {
        path: PathBuf,
        expected: PathKind,
        found: PathKind,
    },
    #[snafu(display("Invalid path segment '{}': {}", segment, reason))]
    InvalidSegment {
        segment: String,
        reason: &'static str,
    },
    #[snafu(display("Path is {} bytes long, the limit is {} bytes", length, MAX_PATH_LEN))]
    PathTooLong { path: PathBuf, length: usize },
    #[snafu(display("Path {} already exists", path.best_effort_path_display()))]
    AlreadyExists { path: PathBuf, source: io::Error },
    #[snafu(display("Directory {} is not empty", path.best_effort_path_display()))]
    DirectoryNotEmpty { path: PathBuf },
    #[snafu(display(
        "Path {} is neither a regular file nor a directory",
        path.best_effort_path_display()
    ))]
    UnsupportedKind { path: PathBuf },
    #[snafu(display("I/O failure on {}", path.best_effort_path_display()))]
    Io { path: PathBuf, source: io::Error },
}

impl PathError {
    /// Maps a raw I/O error on `path` onto the matching variant.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => PathError::NotFound { path, source },
            io::ErrorKind::AlreadyExists => PathError::AlreadyExists { path, source },
            io::ErrorKind::DirectoryNotEmpty => PathError::DirectoryNotEmpty { path },
            _ => PathError::Io { path, source },
        }
    }
}

/// Attaches the path an I/O call was made on.
pub(crate) trait IoResultExt<T> {
    fn at_path(self, path: &Path) -> Result<T, PathError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at_path(self, path: &Path) -> Result<T, PathError> {
        self.map_err(|source| PathError::from_io(path, source))
    }
}

/// Emits a diagnostic for a caller mistake. Silent in release builds.
pub(crate) fn precondition(error: PathError) -> PathError {
    if cfg!(debug_assertions) {
        debug!("Precondition violated: {}", error);
    }
    error
}
