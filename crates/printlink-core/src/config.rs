//! Configuration for the OctoPrint plugin

/// Plugin configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Key of the shared settings blob inside the store
    pub settings_key: String,

    /// Plugin id; also the bucket name inside the settings blob
    pub plugin_id: String,

    /// Human-readable plugin name (settings tab title)
    pub plugin_name: String,

    /// Menu item contributed by the plugin
    pub menu_item_id: String,

    /// Menu item label
    pub menu_label: String,

    /// Host capabilities the menu item is shown for
    pub capabilities: Vec<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            settings_key: "sb:settings".to_string(),
            plugin_id: "octoprint".to_string(),
            plugin_name: "OctoPrint".to_string(),
            menu_item_id: "send-octoprint".to_string(),
            menu_label: "Send to OctoPrint…".to_string(),
            capabilities: vec![
                "slicer".to_string(),
                "laser".to_string(),
                "octoprint".to_string(),
            ],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
