//! Error types for session operations.

use modninja_discovery::DiscoveryError;
use modninja_file_ops::FileOpsError;
use modninja_igdb::CoverError;
use modninja_store::StoreError;

/// Errors produced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    FileOps(#[from] FileOpsError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Cover(#[from] CoverError),

    #[error("unknown export format: {0}")]
    UnknownFormat(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
