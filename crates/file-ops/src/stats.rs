//! Recursive size / file / folder aggregation.

use std::ops::ControlFlow;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::walk::{WalkOptions, walk};

/// Aggregated statistics for a directory tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirStats {
    /// Sum of file lengths in bytes.
    pub size: u64,
    /// Number of non-directory entries (symlinks included).
    pub files: u64,
    /// Number of directories below the root.
    pub folders: u64,
}

/// Statistics plus the number of entries that could not be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkSummary {
    #[serde(flatten)]
    pub stats: DirStats,
    pub errors: u64,
}

/// Walks `dir` once, counting every descendant including dotfiles.
///
/// Each entry is stat'ed as it is visited. Unreadable entries are skipped
/// and tallied in [`WalkSummary::errors`]; a missing `dir` yields zeroed
/// stats with one error.
pub fn aggregate(dir: &Path) -> WalkSummary {
    let mut stats = DirStats::default();

    let errors = walk(dir, WalkOptions::default(), |_, metadata| {
        if metadata.is_dir() {
            stats.folders += 1;
        } else {
            stats.files += 1;
            stats.size += metadata.len();
        }
        ControlFlow::Continue(())
    });

    if errors > 0 {
        tracing::debug!(dir = %dir.display(), errors, "directory walk skipped entries");
    }

    WalkSummary { stats, errors }
}

/// Shorthand for [`aggregate`] when the error count is not needed.
pub fn aggregate_stats(dir: &Path) -> DirStats {
    aggregate(dir).stats
}
