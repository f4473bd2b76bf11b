//! Expansion of application roots into game installations, plus the
//! manually registered ("custom") roots kept in the store.

use std::path::Path;

use modninja_store::{KEY_CUSTOM_MODS, KeyValueStore, StoreExt};
use serde_json::Value;

use crate::DiscoveryError;
use crate::platform::BaseDirs;
use crate::roots::discover_roots;
use crate::types::Installation;

/// Suffix appended to the id of manually registered roots.
pub const CUSTOM_SUFFIX: &str = " (custom)";

fn has_subdirectory(dir: &Path) -> bool {
    std::fs::read_dir(dir).is_ok_and(|entries| {
        entries
            .filter_map(|e| e.ok())
            .any(|e| e.file_type().is_ok_and(|ft| ft.is_dir()))
    })
}

/// Lists the games under one application root.
///
/// A child `<game>` qualifies when `<game>/mods` holds at least one
/// directory. An unreadable root yields nothing.
pub fn installations_in_root(root: &Path) -> Vec<Installation> {
    let Ok(entries) = std::fs::read_dir(root) else {
        tracing::debug!(root = %root.display(), "application root unreadable");
        return Vec::new();
    };

    let mut games: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|ft| ft.is_dir()))
        .collect();
    games.sort_by_key(|e| e.file_name());

    games
        .into_iter()
        .filter_map(|game| {
            let mods_dir = game.path().join("mods");
            has_subdirectory(&mods_dir).then(|| Installation {
                id: game.file_name().to_string_lossy().to_string(),
                mods_dir,
            })
        })
        .collect()
}

/// Returns the custom roots recorded in the store.
pub fn custom_installations(store: &dyn KeyValueStore) -> Vec<Installation> {
    store.get_or_default(KEY_CUSTOM_MODS)
}

/// Discovers every installation: found roots first, then custom ones.
pub fn discover_installations(
    bases: &BaseDirs,
    app_name: &str,
    store: &dyn KeyValueStore,
) -> Vec<Installation> {
    let scan = discover_roots(bases, app_name);

    let mut out: Vec<Installation> = scan
        .roots
        .iter()
        .flat_map(|root| installations_in_root(root))
        .collect();
    out.extend(custom_installations(store));
    out
}

/// Registers `mods_dir` as a custom root.
///
/// The id is the parent folder's name plus [`CUSTOM_SUFFIX`]. Registering
/// the same `mods_dir` twice keeps the first entry.
pub fn add_custom_root(
    store: &dyn KeyValueStore,
    mods_dir: &Path,
) -> Result<Installation, DiscoveryError> {
    let parent_name = mods_dir
        .parent()
        .and_then(|p| p.file_name())
        .ok_or_else(|| DiscoveryError::InvalidModsDir(mods_dir.to_path_buf()))?;

    let installation = Installation {
        id: format!("{}{CUSTOM_SUFFIX}", parent_name.to_string_lossy()),
        mods_dir: mods_dir.to_path_buf(),
    };

    store.update(KEY_CUSTOM_MODS, &mut |prev| {
        let mut list: Vec<Installation> = prev
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        if !list.iter().any(|c| c.mods_dir == installation.mods_dir) {
            list.push(installation.clone());
        }
        serde_json::to_value(list).unwrap_or(Value::Array(Vec::new()))
    })?;

    tracing::info!(id = %installation.id, mods_dir = %mods_dir.display(), "custom root registered");
    Ok(installation)
}
