//! Keyed settings blob backends

use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::{atomic_write, read_json, StoreError};

/// Keyed access to the process-wide settings blob.
///
/// `set` must be visible to every subsequent `get`, from any handle, by the
/// time it returns.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Read-modify-write one key while holding the store's lock.
    ///
    /// `apply` sees the current value and returns the replacement, or `None`
    /// to leave the key untouched. No other `get`/`set`/`update` on the same
    /// store interleaves with it.
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<Value>) -> Option<Value>,
    ) -> Result<(), StoreError>;
}

/// Settings blob persisted as a single JSON object file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_blob(&self) -> Result<Map<String, Value>, StoreError> {
        match read_json::<Value>(&self.path) {
            Ok(Some(Value::Object(map))) => Ok(map),
            Ok(Some(_)) => {
                warn!(path = %self.path.display(), "settings blob is not an object, starting fresh");
                Ok(Map::new())
            }
            Ok(None) => Ok(Map::new()),
            Err(StoreError::Json { path, source }) => {
                warn!(path = %path.display(), error = %source, "unparsable settings blob, starting fresh");
                Ok(Map::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_blob(&self, key: &str, blob: Map<String, Value>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&Value::Object(blob))
            .map_err(|e| StoreError::json(&self.path, e))?;
        atomic_write(&self.path, json.as_bytes()).map_err(|e| StoreError::io(&self.path, e))?;
        debug!(key, path = %self.path.display(), "settings written");
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut blob = self.read_blob()?;
        debug!(key, path = %self.path.display(), "settings read");
        Ok(blob.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut blob = self.read_blob()?;
        blob.insert(key.to_string(), value);
        self.write_blob(key, blob)
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<Value>) -> Option<Value>,
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut blob = self.read_blob()?;
        match apply(blob.get(key).cloned()) {
            Some(value) => {
                blob.insert(key.to_string(), value);
                self.write_blob(key, blob)
            }
            None => Ok(()),
        }
    }
}

/// In-process settings blob; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Arc<Mutex<Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let blob = self
            .blob
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        Ok(blob.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut blob = self
            .blob
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        blob.insert(key.to_string(), value);
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<Value>) -> Option<Value>,
    ) -> Result<(), StoreError> {
        let mut blob = self
            .blob
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        if let Some(value) = apply(blob.get(key).cloned()) {
            blob.insert(key.to_string(), value);
        }
        Ok(())
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<Value>) -> Option<Value>,
    ) -> Result<(), StoreError> {
        (**self).update(key, apply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("settings.json"));
        assert_eq!(store.get("sb:settings").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_then_get() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("settings.json"));

        store.set("sb:settings", json!({"octoprint": {"instances": []}})).unwrap();
        let value = store.get("sb:settings").unwrap().unwrap();
        assert_eq!(value["octoprint"]["instances"], json!([]));
    }

    #[test]
    fn test_file_store_preserves_other_keys() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("settings.json"));

        store.set("theme", json!("dark")).unwrap();
        store.set("sb:settings", json!({})).unwrap();

        assert_eq!(store.get("theme").unwrap(), Some(json!("dark")));
    }

    #[test]
    fn test_file_store_visible_to_second_handle() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let writer = JsonFileStore::new(&path);
        let reader = JsonFileStore::new(&path);

        writer.set("sb:settings", json!({"a": 1})).unwrap();
        assert_eq!(reader.get("sb:settings").unwrap(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_file_store_recovers_from_garbage() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get("sb:settings").unwrap(), None);

        store.set("sb:settings", json!({})).unwrap();
        assert_eq!(store.get("sb:settings").unwrap(), Some(json!({})));
    }

    #[test]
    fn test_memory_store_clones_share_data() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("k", json!(true)).unwrap();
        assert_eq!(other.get("k").unwrap(), Some(json!(true)));
    }

    fn bump(store: &dyn SettingsStore) {
        store
            .update("count", &mut |current: Option<Value>| -> Option<Value> {
                let n = current.and_then(|v| v.as_u64()).unwrap_or(0);
                Some(json!(n + 1))
            })
            .unwrap();
    }

    #[test]
    fn test_update_none_leaves_key_untouched() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("settings.json"));
        store.set("k", json!(1)).unwrap();

        let mut seen: Option<Value> = None;
        store
            .update("k", &mut |current: Option<Value>| -> Option<Value> {
                seen = current;
                None
            })
            .unwrap();

        assert_eq!(seen, Some(json!(1)));
        assert_eq!(store.get("k").unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_memory_update_is_atomic_across_threads() {
        let store = MemoryStore::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        bump(&store);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("count").unwrap(), Some(json!(1000)));
    }

    #[test]
    fn test_file_update_is_atomic_across_threads() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::new(temp.path().join("settings.json")));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        bump(&store);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("count").unwrap(), Some(json!(100)));
    }
}
