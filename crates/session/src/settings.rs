//! GUI settings stored under the `settings` key.

use modninja_store::{KEY_SETTINGS, KeyValueStore, StoreExt};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::SessionError;

/// Settings object owned by the GUI.
///
/// Only `showHidden` is interpreted here; every other key is carried through
/// untouched so a save never drops fields this crate does not know about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub show_hidden: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads a flag the GUI may have stored as a bool, a string or a number.
/// Anything else is `false` rather than an error that would drop the object.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    })
}

/// Loads settings, defaulting to an empty object.
pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
    store.get_or_default(KEY_SETTINGS)
}

/// Replaces the stored settings.
pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<(), SessionError> {
    store.set_typed(KEY_SETTINGS, settings)?;
    Ok(())
}

/// Drops dot-prefixed names unless hidden entries are enabled.
pub fn visible_mods(mods: Vec<String>, settings: &Settings) -> Vec<String> {
    if settings.show_hidden {
        return mods;
    }
    mods.into_iter().filter(|m| !m.starts_with('.')).collect()
}
