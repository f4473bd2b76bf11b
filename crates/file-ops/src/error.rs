//! File operation errors.

use std::path::PathBuf;

/// Errors for operations whose input path itself is unusable.
///
/// Problems with individual entries below that path never surface here;
/// walks skip them.
#[derive(Debug, thiserror::Error)]
pub enum FileOpsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("refusing to delete {0}")]
    Refused(PathBuf),

    #[error("failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
