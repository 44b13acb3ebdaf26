use printlink_core::{Config, Instance, InstanceDraft, Registry};
use printlink_store::{JsonFileStore, SettingsStore};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn file_registry(dir: &tempfile::TempDir) -> Registry {
    let store = JsonFileStore::new(dir.path().join("settings.json"));
    Registry::new(Arc::new(store), &Config::new())
}

/// Write a raw instances array straight to the settings file
pub fn seed_instances(dir: &tempfile::TempDir, instances: Value) {
    JsonFileStore::new(dir.path().join("settings.json"))
        .set("sb:settings", json!({"octoprint": {"instances": instances}}))
        .unwrap();
}

pub fn draft(name: &str, default: bool) -> InstanceDraft {
    InstanceDraft::new(name, format!("http://{}.local", name), format!("key-{}", name), default)
}

pub fn default_count(instances: &[Instance]) -> usize {
    instances.iter().filter(|i| i.default).count()
}

/// Deterministic xorshift so operation sequences are reproducible
pub struct Sequence(u64);

impl Sequence {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next(&mut self, bound: usize) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % bound as u64) as usize
    }
}
