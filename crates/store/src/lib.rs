//! Flat key-value settings store.
//!
//! Every component that persists state (token, cover index, custom roots,
//! GUI settings) receives a `&dyn KeyValueStore` instead of reaching for a
//! global. Two implementations are provided:
//!
//! - [`JsonFileStore`]: a single JSON object on disk, re-read on every access.
//! - [`MemoryStore`]: an in-process map, used by tests and dry runs.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Store key for the cached OAuth token (`{token, exp}`).
pub const KEY_IGDB_TOKEN: &str = "igdbToken";
/// Store key for the identifier → image id cover index.
pub const KEY_COVER_INDEX: &str = "coverIndex";
/// Store key for manually added installation roots.
pub const KEY_CUSTOM_MODS: &str = "customMods";
/// Store key for the GUI-owned settings object.
pub const KEY_SETTINGS: &str = "settings";

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Key-value persistence boundary.
///
/// `update` is the only way to do a read-modify-write; implementations must
/// apply it against the latest persisted value while holding their lock so
/// concurrent writers to sibling keys are never lost.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Replaces the value under `key`.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Removes `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Atomically transforms the value under `key`.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> Result<(), StoreError>;
}

/// Typed helpers over any [`KeyValueStore`], including trait objects.
pub trait StoreExt: KeyValueStore {
    /// Deserializes the value under `key`, falling back to `T::default()`
    /// when the key is missing or holds something of the wrong shape.
    fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get_typed(key).unwrap_or_default()
    }

    /// Deserializes the value under `key`, or `None` if missing or malformed.
    fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed store value");
                None
            }
        }
    }

    /// Serializes and stores `value` under `key`.
    fn set_typed<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.set(key, serde_json::to_value(value)?)
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Token {
        token: String,
        exp: i64,
    }

    #[test]
    fn typed_roundtrip_through_trait_object() {
        let store = MemoryStore::new();
        let dyn_store: &dyn KeyValueStore = &store;

        let tok = Token {
            token: "abc".into(),
            exp: 42,
        };
        dyn_store.set_typed(KEY_IGDB_TOKEN, &tok).unwrap();

        let back: Token = dyn_store.get_or_default(KEY_IGDB_TOKEN);
        assert_eq!(back, tok);
    }

    #[test]
    fn malformed_value_yields_default() {
        let store = MemoryStore::new();
        store
            .set(KEY_IGDB_TOKEN, serde_json::json!("not an object"))
            .unwrap();

        let back: Token = store.get_or_default(KEY_IGDB_TOKEN);
        assert_eq!(back, Token::default());
        assert!(store.get_typed::<Token>(KEY_IGDB_TOKEN).is_none());
    }

    #[test]
    fn missing_key_yields_default() {
        let store = MemoryStore::new();
        let index: std::collections::BTreeMap<String, String> =
            store.get_or_default(KEY_COVER_INDEX);
        assert!(index.is_empty());
    }
}
