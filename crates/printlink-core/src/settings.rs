//! Reads and writes the plugin's bucket inside the shared settings blob

use printlink_store::SettingsStore;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{Config, Error, Instance, Result, SettingsBucket};

/// Loads and saves the `{ instances: [...] }` bucket for one plugin.
///
/// Every access goes through `SettingsStore::update`, so adapters sharing a
/// store never interleave their read-modify-write cycles.
#[derive(Clone)]
pub struct SettingsAdapter {
    store: Arc<dyn SettingsStore>,
    settings_key: String,
    plugin_id: String,
}

/// Outcome of [`SettingsAdapter::modify`]
#[derive(Debug)]
pub struct Change<T> {
    pub value: T,
    /// Bucket as it stands after the edit
    pub bucket: SettingsBucket,
    /// Whether the store accepted the write
    pub saved: Result<()>,
}

impl SettingsAdapter {
    pub fn new(store: Arc<dyn SettingsStore>, config: &Config) -> Self {
        Self {
            store,
            settings_key: config.settings_key.clone(),
            plugin_id: config.plugin_id.clone(),
        }
    }

    /// Load the bucket, repairing its shape. Never fails.
    ///
    /// When the stored shape needed repair the normalized bucket is written
    /// back. Repaired ids are derived from the records themselves, so reads
    /// agree with each other even when that write fails.
    pub fn load(&self) -> SettingsBucket {
        let mut loaded = None;
        let result = self.store.update(
            &self.settings_key,
            &mut |blob: Option<Value>| -> Option<Value> {
                let (bucket, repaired) = normalize_bucket(self.bucket_of(blob.as_ref()));
                let write = if repaired {
                    debug!(plugin = %self.plugin_id, "normalized settings bucket");
                    self.encode(blob, &bucket).ok()
                } else {
                    None
                };
                loaded = Some(bucket);
                write
            },
        );

        if let Err(e) = result {
            warn!(error = %e, "settings store failed while loading");
        }
        loaded.unwrap_or_default()
    }

    /// Write the full bucket in a single store update
    pub fn save(&self, bucket: &SettingsBucket) -> Result<()> {
        let mut encoded = Ok(());
        self.store.update(
            &self.settings_key,
            &mut |blob: Option<Value>| -> Option<Value> {
                match self.encode(blob, bucket) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        encoded = Err(e);
                        None
                    }
                }
            },
        )?;
        encoded?;
        debug!(plugin = %self.plugin_id, count = bucket.instances.len(), "settings bucket saved");
        Ok(())
    }

    /// Apply `edit` to the current bucket while the store is locked.
    ///
    /// `edit` returns `None` to leave storage untouched, and so does this.
    /// When the store cannot be read the edit runs against an empty bucket
    /// and `saved` carries the failure.
    pub fn modify<T>(
        &self,
        edit: impl FnOnce(&mut SettingsBucket) -> Option<T>,
    ) -> Option<Change<T>> {
        let mut edit = Some(edit);
        let mut applied = None;
        let mut encoded = Ok(());

        let result = self.store.update(
            &self.settings_key,
            &mut |blob: Option<Value>| -> Option<Value> {
                let edit = edit.take()?;
                let (mut bucket, _) = normalize_bucket(self.bucket_of(blob.as_ref()));
                let value = edit(&mut bucket)?;
                let next = match self.encode(blob, &bucket) {
                    Ok(next) => Some(next),
                    Err(e) => {
                        encoded = Err(e);
                        None
                    }
                };
                applied = Some((value, bucket));
                next
            },
        );

        match (applied, edit.take()) {
            (Some((value, bucket)), _) => Some(Change {
                value,
                bucket,
                saved: result.map_err(Error::from).and(encoded.map_err(Error::from)),
            }),
            (None, Some(edit)) => {
                let saved = result.map_err(Error::from);
                if let Err(e) = &saved {
                    warn!(error = %e, "settings unreadable, editing an empty bucket");
                }
                let mut bucket = SettingsBucket::default();
                let value = edit(&mut bucket)?;
                Some(Change {
                    value,
                    bucket,
                    saved,
                })
            }
            (None, None) => None,
        }
    }

    fn bucket_of<'a>(&self, blob: Option<&'a Value>) -> Option<&'a Value> {
        blob.and_then(|b| b.get(&self.plugin_id))
    }

    /// The blob with this plugin's bucket replaced; other keys are kept
    fn encode(
        &self,
        blob: Option<Value>,
        bucket: &SettingsBucket,
    ) -> std::result::Result<Value, serde_json::Error> {
        let mut map = match blob {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        map.insert(self.plugin_id.clone(), serde_json::to_value(bucket)?);
        Ok(Value::Object(map))
    }
}

/// Coerce whatever is stored into a valid bucket.
///
/// Returns the bucket and whether anything had to change.
pub fn normalize_bucket(raw: Option<&Value>) -> (SettingsBucket, bool) {
    let Some(entries) = raw.and_then(|r| r.get("instances")).and_then(Value::as_array) else {
        return (SettingsBucket::default(), true);
    };

    let mut repaired = false;
    let mut seen = HashSet::new();
    let mut instances = Vec::with_capacity(entries.len());

    for (position, entry) in entries.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            repaired = true;
            continue;
        };

        let (mut instance, fixed) = normalize_instance(obj);
        repaired |= fixed;

        if instance.id.is_empty() || seen.contains(&instance.id) {
            instance.id = derived_id(position, &instance, &seen);
            repaired = true;
        }
        seen.insert(instance.id.clone());
        instances.push(instance);
    }

    (SettingsBucket { instances }, repaired)
}

/// Name-based id for a record stored without a usable one
fn derived_id(position: usize, instance: &Instance, taken: &HashSet<String>) -> String {
    let mut salt = 0u32;
    loop {
        let seed = format!(
            "{}\n{}\n{}\n{}\n{}",
            position, instance.id, instance.name, instance.url, salt
        );
        let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, seed.as_bytes()).to_string();
        if !taken.contains(&id) {
            return id;
        }
        salt += 1;
    }
}

fn normalize_instance(obj: &Map<String, Value>) -> (Instance, bool) {
    let mut repaired = false;
    let mut text = |field: &str| match obj.get(field) {
        Some(Value::String(s)) => s.clone(),
        _ => {
            repaired = true;
            String::new()
        }
    };

    let id = text("id");
    let name = text("name");
    let url = text("url");
    let key = text("key");

    let default = match obj.get("default") {
        Some(Value::Bool(b)) => *b,
        _ => {
            repaired = true;
            false
        }
    };

    (
        Instance {
            id,
            name,
            url,
            key,
            default,
        },
        repaired,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use printlink_store::MemoryStore;
    use serde_json::json;

    fn adapter(store: &MemoryStore) -> SettingsAdapter {
        SettingsAdapter::new(Arc::new(store.clone()), &Config::new())
    }

    #[test]
    fn test_load_absent_bucket_creates_empty() {
        let store = MemoryStore::new();
        let bucket = adapter(&store).load();
        assert!(bucket.instances.is_empty());

        let stored = store.get("sb:settings").unwrap().unwrap();
        assert_eq!(stored["octoprint"], json!({"instances": []}));
    }

    #[test]
    fn test_load_instances_not_a_sequence() {
        let store = MemoryStore::new();
        store
            .set("sb:settings", json!({"octoprint": {"instances": "oops"}}))
            .unwrap();

        let bucket = adapter(&store).load();
        assert!(bucket.instances.is_empty());
    }

    #[test]
    fn test_load_keeps_other_plugins() {
        let store = MemoryStore::new();
        store
            .set("sb:settings", json!({"laser": {"power": 80}}))
            .unwrap();

        adapter(&store).load();
        let stored = store.get("sb:settings").unwrap().unwrap();
        assert_eq!(stored["laser"], json!({"power": 80}));
    }

    #[test]
    fn test_legacy_records_get_stable_ids() {
        let store = MemoryStore::new();
        store
            .set(
                "sb:settings",
                json!({"octoprint": {"instances": [
                    {"name": "Old", "url": "http://old", "key": "k", "default": true},
                    42
                ]}}),
            )
            .unwrap();

        let settings = adapter(&store);
        let first = settings.load();
        assert_eq!(first.instances.len(), 1);
        assert!(!first.instances[0].id.is_empty());
        assert_eq!(first.instances[0].name, "Old");

        let second = settings.load();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_coerces_field_types() {
        let raw = json!({"instances": [
            {"id": "a", "name": 5, "url": null, "key": "k", "default": "yes"}
        ]});
        let (bucket, repaired) = normalize_bucket(Some(&raw));
        assert!(repaired);
        let instance = &bucket.instances[0];
        assert_eq!(instance.id, "a");
        assert_eq!(instance.name, "");
        assert_eq!(instance.url, "");
        assert!(!instance.default);
    }

    #[test]
    fn test_normalize_duplicate_ids() {
        let raw = json!({"instances": [
            {"id": "a", "name": "", "url": "", "key": "", "default": true},
            {"id": "a", "name": "", "url": "", "key": "", "default": false}
        ]});
        let (bucket, repaired) = normalize_bucket(Some(&raw));
        assert!(repaired);
        assert_eq!(bucket.instances[0].id, "a");
        assert_ne!(bucket.instances[1].id, "a");
    }

    #[test]
    fn test_well_formed_bucket_untouched() {
        let raw = json!({"instances": [
            {"id": "a", "name": "A", "url": "http://a", "key": "k", "default": true}
        ]});
        let (_, repaired) = normalize_bucket(Some(&raw));
        assert!(!repaired);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let store = MemoryStore::new();
        let settings = adapter(&store);
        let bucket = SettingsBucket {
            instances: vec![
                Instance {
                    id: "1".to_string(),
                    name: "A".to_string(),
                    url: "http://a".to_string(),
                    key: "k1".to_string(),
                    default: false,
                },
                Instance {
                    id: "2".to_string(),
                    name: "".to_string(),
                    url: "http://b".to_string(),
                    key: "".to_string(),
                    default: true,
                },
            ],
        };

        settings.save(&bucket).unwrap();
        assert_eq!(settings.load(), bucket);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = printlink_store::JsonFileStore::new(temp.path().join("settings.json"));
        let settings = SettingsAdapter::new(Arc::new(store), &Config::new());

        let bucket = SettingsBucket {
            instances: vec![Instance {
                id: "x".to_string(),
                name: "Voron".to_string(),
                url: "https://voron.local".to_string(),
                key: "abc".to_string(),
                default: true,
            }],
        };
        settings.save(&bucket).unwrap();
        assert_eq!(settings.load(), bucket);
    }

    #[test]
    fn test_repaired_ids_are_deterministic() {
        let raw = json!({"instances": [
            {"name": "Old", "url": "http://old", "key": "k", "default": true},
            {"name": "Old", "url": "http://old", "key": "k", "default": false},
            {"id": "a", "name": "", "url": "", "key": "", "default": false},
            {"id": "a", "name": "", "url": "", "key": "", "default": false}
        ]});

        let (first, _) = normalize_bucket(Some(&raw));
        let (second, _) = normalize_bucket(Some(&raw));
        assert_eq!(first, second);

        let ids: HashSet<_> = first.instances.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_modify_none_leaves_store_untouched() {
        let store = MemoryStore::new();
        store
            .set("sb:settings", json!({"octoprint": {"instances": "oops"}}))
            .unwrap();

        let change = adapter(&store).modify(|_| None::<()>);
        assert!(change.is_none());
        assert_eq!(
            store.get("sb:settings").unwrap().unwrap()["octoprint"]["instances"],
            json!("oops")
        );
    }

    #[test]
    fn test_modify_writes_edited_bucket() {
        let store = MemoryStore::new();
        let settings = adapter(&store);

        let change = settings
            .modify(|bucket| {
                bucket.instances.push(Instance {
                    id: "1".to_string(),
                    name: "A".to_string(),
                    url: "http://a".to_string(),
                    key: String::new(),
                    default: true,
                });
                Some(bucket.instances.len())
            })
            .unwrap();

        assert_eq!(change.value, 1);
        assert!(change.saved.is_ok());
        assert_eq!(settings.load(), change.bucket);
    }
}
