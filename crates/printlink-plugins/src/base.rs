//! Base plugin trait and the host interface plugins talk to

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Fire-and-forget transient message to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Services the host application offers to plugins
pub trait Host: Send + Sync {
    /// Contribute an entry to the main menu
    fn add_menu_item(&mut self, item: MenuItem);

    /// Show a transient message
    fn notify(&self, message: &str);

    /// Ask the user for a line of text. `None` means cancelled.
    fn prompt(&self, message: &str, default: &str) -> Option<String>;

    /// Job the host currently has open, if any
    fn current_job(&self) -> Option<crate::Payload> {
        None
    }
}

/// Adapts a host to the notifier interface
pub struct HostNotifier<'a>(pub &'a dyn Host);

impl Notifier for HostNotifier<'_> {
    fn notify(&self, message: &str) {
        self.0.notify(message);
    }
}

/// Menu entry contributed by a plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    /// Capabilities that make the item visible; gating is up to the host
    pub when_enabled_of: Vec<String>,
}

/// Settings tab descriptor; fields are empty when the plugin renders its own panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSchema {
    pub title: String,
    pub fields: Vec<String>,
}

/// Render model for a plugin's settings tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPanel {
    pub title: String,
    pub rows: Vec<PanelRow>,
    pub add_label: String,
}

/// One row of the instance list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    /// 1-based position in the list
    pub position: usize,
    pub id: String,
    pub label: String,
    pub url: String,
    pub is_default: bool,
}

/// Which plugins the user has switched on or off
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginConfig {
    #[serde(default)]
    pub enabled: HashMap<String, bool>,
}

impl PluginConfig {
    /// Load plugin config, treating a missing file as all-enabled
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Ok(printlink_store::read_json(path)?.unwrap_or_default())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        printlink_store::atomic_write(path, json.as_bytes())?;
        Ok(())
    }

    /// Plugins are enabled unless explicitly disabled
    pub fn is_enabled(&self, plugin_id: &str) -> bool {
        self.enabled.get(plugin_id).copied().unwrap_or(true)
    }

    pub fn set_enabled(&mut self, plugin_id: &str, enabled: bool) {
        self.enabled.insert(plugin_id.to_string(), enabled);
    }
}

/// A plugin the host can register
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Plugin id (unique identifier, also its settings bucket name)
    fn id(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        "0.1.0"
    }

    /// Shipped with the host rather than installed
    fn built_in(&self) -> bool {
        false
    }

    fn schema(&self) -> PluginSchema {
        PluginSchema {
            title: self.name().to_string(),
            fields: Vec::new(),
        }
    }

    // Lifecycle hooks (default implementations do nothing)

    /// Called once after registration; contribute menu items here
    fn on_init(&mut self, _host: &mut dyn Host) {}

    /// Called with the plugin's stored settings value
    fn on_settings(&mut self, _settings: Option<&serde_json::Value>) {}

    fn on_enable(&mut self) {}

    fn on_disable(&mut self) {}

    /// Custom settings tab content
    fn build_settings_panel(&self) -> Option<SettingsPanel> {
        None
    }

    /// Called when any menu item is tapped; ignore ids you did not contribute
    async fn on_menu_tap(&self, _item_id: &str, _host: &dyn Host) {}
}
