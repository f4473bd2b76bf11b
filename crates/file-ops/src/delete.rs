//! Mods directory removal.

use std::path::Path;

use crate::error::FileOpsError;

/// Recursively deletes a game's mods directory.
///
/// A directory that is already gone counts as success. Refuses filesystem
/// roots and anything that is not a directory.
pub fn delete_mods_dir(mods_dir: &Path) -> Result<(), FileOpsError> {
    let metadata = match std::fs::symlink_metadata(mods_dir) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(FileOpsError::Read {
                path: mods_dir.to_path_buf(),
                source,
            });
        }
    };

    if !metadata.is_dir() {
        return Err(FileOpsError::NotADirectory(mods_dir.to_path_buf()));
    }
    if mods_dir.parent().is_none() {
        return Err(FileOpsError::Refused(mods_dir.to_path_buf()));
    }

    std::fs::remove_dir_all(mods_dir).map_err(|source| FileOpsError::Delete {
        path: mods_dir.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %mods_dir.display(), "deleted mods directory");
    Ok(())
}
