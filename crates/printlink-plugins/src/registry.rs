//! Host-side container for registered plugins

use serde_json::Value;
use tracing::info;

use crate::base::{Host, Plugin, PluginConfig, SettingsPanel};

struct Entry {
    plugin: Box<dyn Plugin>,
    enabled: bool,
}

/// Summary of one registered plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub built_in: bool,
    pub enabled: bool,
}

/// Registry for managing multiple plugins
pub struct PluginRegistry {
    entries: Vec<Entry>,
    config: PluginConfig,
}

impl PluginRegistry {
    /// Create a new empty registry; every plugin counts as enabled
    pub fn new() -> Self {
        Self::with_config(PluginConfig::default())
    }

    pub fn with_config(config: PluginConfig) -> Self {
        Self {
            entries: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Register a plugin; its enabled state comes from the config
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        let enabled = self.config.is_enabled(plugin.id());
        info!(plugin = plugin.id(), enabled, "plugin registered");
        self.entries.push(Entry { plugin, enabled });
    }

    /// Call on_init for enabled plugins
    pub fn init_all(&mut self, host: &mut dyn Host) {
        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            entry.plugin.on_init(host);
        }
    }

    /// Call on_settings with each plugin's bucket from the settings blob
    pub fn load_settings(&mut self, blob: Option<&Value>) {
        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            let bucket = blob.and_then(|b| b.get(entry.plugin.id()));
            entry.plugin.on_settings(bucket);
        }
    }

    /// Enable a plugin by id; returns false when unknown
    pub fn enable(&mut self, id: &str) -> bool {
        self.set_enabled(id, true)
    }

    /// Disable a plugin by id; returns false when unknown
    pub fn disable(&mut self, id: &str) -> bool {
        self.set_enabled(id, false)
    }

    fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.plugin.id() == id) else {
            return false;
        };
        self.config.set_enabled(id, enabled);
        if entry.enabled != enabled {
            entry.enabled = enabled;
            if enabled {
                entry.plugin.on_enable();
            } else {
                entry.plugin.on_disable();
            }
        }
        true
    }

    /// Deliver a menu tap to every enabled plugin
    pub async fn tap(&self, item_id: &str, host: &dyn Host) {
        for entry in self.entries.iter().filter(|e| e.enabled) {
            entry.plugin.on_menu_tap(item_id, host).await;
        }
    }

    /// Settings tabs of enabled plugins, keyed by plugin id
    pub fn settings_panels(&self) -> Vec<(String, SettingsPanel)> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .filter_map(|e| {
                e.plugin
                    .build_settings_panel()
                    .map(|panel| (e.plugin.id().to_string(), panel))
            })
            .collect()
    }

    pub fn list(&self) -> Vec<PluginInfo> {
        self.entries
            .iter()
            .map(|e| PluginInfo {
                id: e.plugin.id().to_string(),
                name: e.plugin.name().to_string(),
                version: e.plugin.version().to_string(),
                built_in: e.plugin.built_in(),
                enabled: e.enabled,
            })
            .collect()
    }

    /// Get number of registered plugins
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
