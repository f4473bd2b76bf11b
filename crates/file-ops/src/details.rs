//! Per-mod detail lookups: timestamps, readme, screenshots.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FileOpsError;
use crate::stats::{DirStats, aggregate_stats};

/// Readme file names probed in order.
pub const README_CANDIDATES: [&str; 4] = ["README.md", "README.txt", "INSTALL.txt", "CHANGELOG.txt"];

/// Sub-directory holding a mod's screenshots.
pub const SCREENSHOTS_DIR: &str = "screenshots";

const SCREENSHOT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Detail view data for a single mod folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModInfo {
    /// Absolute path of the mod folder.
    pub full: PathBuf,
    /// Birth time; `None` on filesystems that do not record it.
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub accessed: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub stats: DirStats,
}

/// A readme found inside a mod folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readme {
    pub filename: String,
    pub content: String,
}

fn to_utc(time: std::io::Result<SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

/// Stats the mod folder `mods_dir/name` and aggregates its contents.
pub fn mod_info(mods_dir: &Path, name: &str) -> Result<ModInfo, FileOpsError> {
    let full = mods_dir.join(name);
    let metadata = std::fs::metadata(&full).map_err(|source| FileOpsError::Read {
        path: full.clone(),
        source,
    })?;

    if !metadata.is_dir() {
        return Err(FileOpsError::NotADirectory(full));
    }

    let stats = aggregate_stats(&full);
    Ok(ModInfo {
        created: to_utc(metadata.created()),
        modified: to_utc(metadata.modified()),
        accessed: to_utc(metadata.accessed()),
        stats,
        full,
    })
}

/// Returns the first readable readme of the mod, if any.
///
/// Content is decoded as UTF-8 with invalid sequences replaced.
pub fn mod_readme(mods_dir: &Path, name: &str) -> Option<Readme> {
    let mod_path = mods_dir.join(name);

    README_CANDIDATES.iter().find_map(|file| {
        let bytes = std::fs::read(mod_path.join(file)).ok()?;
        Some(Readme {
            filename: (*file).to_string(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
        })
    })
}

/// Lists image files in the mod's `screenshots` folder, sorted by path.
///
/// A missing or unreadable folder yields an empty list.
pub fn mod_screenshots(mods_dir: &Path, name: &str) -> Vec<PathBuf> {
    let shots_dir = mods_dir.join(name).join(SCREENSHOTS_DIR);
    let Ok(entries) = std::fs::read_dir(&shots_dir) else {
        return Vec::new();
    };

    let mut shots: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_screenshot(path))
        .collect();
    shots.sort();
    shots
}

fn is_screenshot(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| SCREENSHOT_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn mods_dir_with(name: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join(name)).unwrap();
        tmp
    }

    #[test]
    fn info_includes_stats_and_times() {
        let tmp = mods_dir_with("Better Textures");
        let m = tmp.path().join("Better Textures");
        fs::write(m.join("a.dds"), vec![0u8; 100]).unwrap();
        fs::create_dir(m.join("sub")).unwrap();

        let info = mod_info(tmp.path(), "Better Textures").unwrap();
        assert_eq!(info.full, m);
        assert_eq!(info.stats.files, 1);
        assert_eq!(info.stats.folders, 1);
        assert_eq!(info.stats.size, 100);
        assert!(info.modified.is_some());
    }

    #[test]
    fn info_missing_mod_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(mod_info(tmp.path(), "ghost").is_err());
    }

    #[test]
    fn info_on_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("notes.txt"), b"").unwrap();
        let err = mod_info(tmp.path(), "notes.txt").unwrap_err();
        assert!(matches!(err, FileOpsError::NotADirectory(_)));
    }

    #[test]
    fn readme_prefers_candidate_order() {
        let tmp = mods_dir_with("m");
        let m = tmp.path().join("m");
        fs::write(m.join("CHANGELOG.txt"), "v1").unwrap();
        fs::write(m.join("README.txt"), "hello").unwrap();

        let readme = mod_readme(tmp.path(), "m").unwrap();
        assert_eq!(readme.filename, "README.txt");
        assert_eq!(readme.content, "hello");
    }

    #[test]
    fn readme_lossy_decoding() {
        let tmp = mods_dir_with("m");
        fs::write(tmp.path().join("m").join("README.md"), [b'o', b'k', 0xFF]).unwrap();

        let readme = mod_readme(tmp.path(), "m").unwrap();
        assert!(readme.content.starts_with("ok"));
    }

    #[test]
    fn readme_absent() {
        let tmp = mods_dir_with("m");
        assert!(mod_readme(tmp.path(), "m").is_none());
    }

    #[test]
    fn screenshots_filter_by_extension() {
        let tmp = mods_dir_with("m");
        let shots = tmp.path().join("m").join(SCREENSHOTS_DIR);
        fs::create_dir(&shots).unwrap();
        fs::write(shots.join("b.PNG"), b"").unwrap();
        fs::write(shots.join("a.jpeg"), b"").unwrap();
        fs::write(shots.join("c.gif"), b"").unwrap();
        fs::write(shots.join("notes.txt"), b"").unwrap();

        let found = mod_screenshots(tmp.path(), "m");
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpeg", "b.PNG", "c.gif"]);
    }

    #[test]
    fn screenshots_missing_folder() {
        let tmp = mods_dir_with("m");
        assert!(mod_screenshots(tmp.path(), "m").is_empty());
    }

    #[test]
    fn info_serializes_flattened() {
        let info = ModInfo {
            full: PathBuf::from("/mods/x"),
            created: None,
            modified: None,
            accessed: None,
            stats: DirStats {
                size: 1,
                files: 1,
                folders: 0,
            },
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["size"], 1);
        assert_eq!(json["full"], "/mods/x");
        assert!(json["created"].is_null());
    }
}
