//! JSON-file backed store.
//!
//! The whole store is one JSON object, e.g. `~/.config/modninja/store.json`:
//!
//! ```json
//! { "igdbToken": {"token": "...", "exp": 1700000000},
//!   "coverIndex": {"Fallout4": "abc123"},
//!   "customMods": [{"id": "Foo (custom)", "modsDir": "/games/Foo/mods"}],
//!   "settings": {"theme": "dark"} }
//! ```
//!
//! Every read goes to disk so two handles on the same file never act on a
//! stale copy. Writes go through a temp file and a rename.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::{KeyValueStore, StoreError};

/// A [`KeyValueStore`] persisted as a single JSON object.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (without creating) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole store. A missing or corrupt file is empty; a file that
    /// cannot be read is an error so a write never clobbers it.
    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match std::fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(match serde_json::from_slice::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "store is not a JSON object, ignoring");
                Map::new()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt store, ignoring");
                Map::new()
            }
        })
    }

    fn persist(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_vec_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;

        // Holds an OAuth token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp, &self.path)?;
        tracing::trace!(path = %self.path.display(), "store saved");
        Ok(())
    }

    fn modify(&self, apply: impl FnOnce(&mut Map<String, Value>)) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut map = self.load()?;
        apply(&mut map);
        self.persist(&map)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let _guard = self.lock.lock().ok()?;
        match self.load() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read store");
                None
            }
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.modify(|map| {
            map.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|map| {
            map.remove(key);
        })
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> Result<(), StoreError> {
        self.modify(|map| {
            let next = f(map.remove(key));
            map.insert(key.to_string(), next);
        })
    }
}
