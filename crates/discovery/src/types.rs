use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application folder appended to each relocated base path.
pub const DEFAULT_APP_NAME: &str = "Vortex";

/// A game installation whose mods can be browsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    /// Game folder name, or `"<parent> (custom)"` for manual roots.
    pub id: String,
    /// Absolute path of the `mods` directory.
    pub mods_dir: PathBuf,
}

/// Result of probing every volume for the application directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootScan {
    /// Unique existing directories, in volume order.
    pub roots: Vec<PathBuf>,
    /// Number of volume × relative-path combinations probed.
    pub candidates_tested: usize,
}
