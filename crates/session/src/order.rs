//! Saved mod order, kept as a sidecar file inside the mods directory.

use std::path::Path;

use crate::error::SessionError;

/// Sidecar file holding a JSON array of mod names.
pub const ORDER_FILE: &str = ".modninja-order.json";

/// Reads the saved order for `mods_dir`.
///
/// A missing, unreadable or malformed file means "no saved order".
pub fn load_order(mods_dir: &Path) -> Option<Vec<String>> {
    let path = mods_dir.join(ORDER_FILE);
    let data = match std::fs::read(&path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "order file unreadable");
            return None;
        }
    };

    match serde_json::from_slice(&data) {
        Ok(order) => Some(order),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed order file");
            None
        }
    }
}

/// Writes `mods` as the saved order for `mods_dir`, replacing any previous one.
pub fn save_order(mods_dir: &Path, mods: &[String]) -> Result<(), SessionError> {
    let path = mods_dir.join(ORDER_FILE);
    std::fs::write(&path, serde_json::to_vec(mods)?)?;
    tracing::debug!(path = %path.display(), count = mods.len(), "order saved");
    Ok(())
}

/// Sorts `mods` by position in `order`, stably.
///
/// Names missing from `order` rank before every saved name and keep their
/// relative order.
pub fn apply_order(mods: &mut [String], order: &[String]) {
    let rank = |name: &String| order.iter().position(|o| o == name).map_or(-1, |i| i as i64);
    mods.sort_by_key(rank);
}
