//! Filesystem side of the mod browser.
//!
//! Lists mod folders, aggregates directory statistics, produces the capped
//! relative-path listing behind the detail-view file tree, and reads per-mod
//! extras (timestamps, readme, screenshots).
//!
//! All walks are best-effort: an entry that cannot be read is skipped and
//! counted, never fatal to the whole operation.

mod browse;
mod delete;
mod details;
mod error;
mod stats;
mod tree;
mod walk;

pub use browse::list_entries;
pub use delete::delete_mods_dir;
pub use details::{
    ModInfo, Readme, README_CANDIDATES, SCREENSHOTS_DIR, mod_info, mod_readme, mod_screenshots,
};
pub use error::FileOpsError;
pub use stats::{DirStats, WalkSummary, aggregate, aggregate_stats};
pub use tree::{FileTree, MAX_TREE_ENTRIES, NodeKind, TreeNode, list_tree_paths};

/// Formats a byte count as a short human-readable string (`"1.5 MB"`).
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_size_units() {
        assert_eq!(human_size(0), "0.0 B");
        assert_eq!(human_size(1023), "1023.0 B");
        assert_eq!(human_size(1024), "1.0 KB");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn human_size_caps_at_terabytes() {
        let pb = 1024u64.pow(5);
        assert_eq!(human_size(pb), "1024.0 TB");
    }
}
