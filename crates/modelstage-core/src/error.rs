//! Error type shared by the staging pipeline.

use std::io;
use std::path::{Path, PathBuf};

/// Failure while resolving, fetching, or staging a model.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The server answered with a non-2xx status. Nothing is left on disk.
    #[error("download of {url} failed with HTTP {status}")]
    DownloadFailed { url: String, status: u32 },

    /// libcurl reported a transport error (DNS, connect, reset, ...).
    #[error("transfer of {url} failed")]
    Transfer {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// A local source path does not exist.
    #[error("library path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A local source path exists but is neither a directory nor a `.tar` archive.
    #[error("unknown library path provided: {}", .0.display())]
    UnknownPath(PathBuf),

    /// Staging finished but the model directory still lacks required files.
    #[error("model in {} is incomplete, missing: {}", .dir.display(), .missing.join(", "))]
    IncompleteModel { dir: PathBuf, missing: Vec<String> },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive could not be read as tar.
    #[error("failed to read archive {}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StageError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        StageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn archive(path: &Path, source: io::Error) -> Self {
        StageError::Archive {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type StageResult<T> = Result<T, StageError>;
