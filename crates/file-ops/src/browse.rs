//! Mod folder listing.

use std::path::Path;

use crate::error::FileOpsError;

/// Lists the names of the child directories of `dir`, sorted by name.
///
/// Files are ignored. Dot-prefixed directories are included; hiding them is
/// a presentation choice left to the caller. Children whose type cannot be
/// determined are skipped.
pub fn list_entries(dir: &Path) -> Result<Vec<String>, FileOpsError> {
    let entries = std::fs::read_dir(dir).map_err(|source| FileOpsError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_sorted_dirs_only() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();

        std::fs::create_dir(base.join("Unofficial Patch")).unwrap();
        std::fs::create_dir(base.join("Armor Pack")).unwrap();
        std::fs::create_dir(base.join(".staging")).unwrap();
        std::fs::write(base.join("vortex.deployment.json"), "{}").unwrap();

        let names = list_entries(base).unwrap();
        assert_eq!(names, vec![".staging", "Armor Pack", "Unofficial Patch"]);
    }

    #[test]
    fn sort_is_byte_order() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        std::fs::create_dir(base.join("beta")).unwrap();
        std::fs::create_dir(base.join("Zeta")).unwrap();

        let names = list_entries(base).unwrap();
        assert_eq!(names, vec!["Zeta", "beta"]);
    }

    #[test]
    fn empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_entries(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn nonexistent_dir_is_error() {
        let err = list_entries(Path::new("/definitely/not/real")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/real"));
    }
}
