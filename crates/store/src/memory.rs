//! In-memory store.

use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::{KeyValueStore, StoreError};

/// A [`KeyValueStore`] that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut data = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        data.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        data.remove(key);
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> Result<(), StoreError> {
        let mut data = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        let next = f(data.remove(key));
        data.insert(key.to_string(), next);
        Ok(())
    }
}
