//! Instance registry enforcing the single-default invariant

use printlink_store::SettingsStore;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{Config, Instance, InstanceDraft, SettingsAdapter, SettingsBucket};

const EVENT_CAPACITY: usize = 64;

/// What a mutation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
    DefaultChanged,
}

/// Published after every successful mutation so views can resync
#[derive(Debug, Clone)]
pub struct RegistryEvent {
    pub kind: ChangeKind,
    pub id: String,
    pub instances: Vec<Instance>,
}

/// Ordered, persisted collection of printer instances.
///
/// Every operation is a single read-modify-write on the store, so handles
/// sharing a store (another view, a script) serialize against each other and
/// never overwrite changes with stale data.
pub struct Registry {
    settings: SettingsAdapter,
    events: broadcast::Sender<RegistryEvent>,
}

impl Registry {
    pub fn new(store: Arc<dyn SettingsStore>, config: &Config) -> Self {
        Self::from_adapter(SettingsAdapter::new(store, config))
    }

    pub fn from_adapter(settings: SettingsAdapter) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { settings, events }
    }

    pub fn settings(&self) -> &SettingsAdapter {
        &self.settings
    }

    /// Receive a notification after each mutation
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    /// Current instances in insertion order
    pub fn list(&self) -> Vec<Instance> {
        self.settings.load().instances
    }

    pub fn get(&self, id: &str) -> Option<Instance> {
        self.list().into_iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// Append a new instance and return it as stored
    pub fn add(&self, draft: InstanceDraft) -> Instance {
        let instance = Instance::from_draft(draft);
        let id = instance.id.clone();
        let unsaved = instance.clone();

        let stored = self
            .apply(ChangeKind::Added, &id, move |bucket| {
                let mut instance = instance;
                if instance.default {
                    clear_defaults(&mut bucket.instances);
                }
                if bucket.default_instance().is_none() {
                    instance.default = true;
                }
                bucket.instances.push(instance);
                enforce_single_default(&mut bucket.instances);
                bucket.instances.last().cloned()
            })
            .unwrap_or(unsaved);

        info!(id = %stored.id, name = %stored.name, default = stored.default, "instance added");
        stored
    }

    /// Replace the editable fields of an instance. No-op when `id` is unknown.
    pub fn update(&self, id: &str, draft: InstanceDraft) -> bool {
        let updated = self.apply(ChangeKind::Updated, id, |bucket| {
            let pos = bucket.position(id)?;
            if draft.default {
                clear_defaults(&mut bucket.instances);
            }
            bucket.instances[pos].apply(draft);
            enforce_single_default(&mut bucket.instances);
            Some(())
        });

        match updated {
            Some(()) => info!(id, "instance updated"),
            None => debug!(id, "update ignored, instance not found"),
        }
        updated.is_some()
    }

    /// Delete an instance, promoting the first remaining one if the default
    /// was removed. No-op when `id` is unknown.
    pub fn remove(&self, id: &str) -> bool {
        let remaining = self.apply(ChangeKind::Removed, id, |bucket| {
            let pos = bucket.position(id)?;
            bucket.instances.remove(pos);
            enforce_single_default(&mut bucket.instances);
            Some(bucket.instances.len())
        });

        match remaining {
            Some(remaining) => info!(id, remaining, "instance removed"),
            None => debug!(id, "remove ignored, instance not found"),
        }
        remaining.is_some()
    }

    /// Make `id` the only default. No-op when `id` is unknown.
    pub fn set_default(&self, id: &str) -> bool {
        let changed = self.apply(ChangeKind::DefaultChanged, id, |bucket| {
            bucket.position(id)?;
            for instance in &mut bucket.instances {
                instance.default = instance.id == id;
            }
            Some(())
        });

        match changed {
            Some(()) => info!(id, "default instance changed"),
            None => debug!(id, "set_default ignored, instance not found"),
        }
        changed.is_some()
    }

    /// Run one edit against storage and publish the resulting snapshot
    fn apply<T>(
        &self,
        kind: ChangeKind,
        id: &str,
        edit: impl FnOnce(&mut SettingsBucket) -> Option<T>,
    ) -> Option<T> {
        let change = self.settings.modify(edit)?;
        if let Err(e) = &change.saved {
            warn!(error = %e, ?kind, "failed to persist instances");
        }
        // No receivers is fine
        let _ = self.events.send(RegistryEvent {
            kind,
            id: id.to_string(),
            instances: change.bucket.instances,
        });
        Some(change.value)
    }
}

fn clear_defaults(instances: &mut [Instance]) {
    for instance in instances {
        instance.default = false;
    }
}

/// Keep the first default and clear the rest; promote the first instance
/// when none is default.
fn enforce_single_default(instances: &mut [Instance]) {
    let mut found = false;
    for instance in instances.iter_mut() {
        if instance.default {
            if found {
                instance.default = false;
            }
            found = true;
        }
    }
    if !found {
        if let Some(first) = instances.first_mut() {
            first.default = true;
        }
    }
}
