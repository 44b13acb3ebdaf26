use printlink_core::{Config, Error, Instance, Registry};
use printlink_plugins::{OctoPrintPlugin, PluginConfig, PluginRegistry, StubTransport};
use printlink_store::{JsonFileStore, Paths, SettingsStore};
use std::sync::Arc;

/// Shared handles for one CLI invocation
pub struct App {
    pub paths: Paths,
    pub config: Config,
    store: Arc<JsonFileStore>,
}

impl App {
    pub fn open() -> anyhow::Result<Self> {
        Ok(Self::with_paths(Paths::new()?))
    }

    pub fn with_paths(paths: Paths) -> Self {
        let store = Arc::new(JsonFileStore::new(paths.settings_file()));
        Self {
            paths,
            config: Config::new(),
            store,
        }
    }

    pub fn store(&self) -> Arc<dyn SettingsStore> {
        self.store.clone()
    }

    pub fn plugin(&self) -> OctoPrintPlugin {
        let registry = Arc::new(Registry::new(self.store(), &self.config));
        OctoPrintPlugin::new(registry, Arc::new(StubTransport), self.config.clone())
    }

    pub fn plugin_config(&self) -> anyhow::Result<PluginConfig> {
        PluginConfig::load(&self.paths.plugin_config_file())
    }

    /// Host-side plugin registry with the built-in plugins registered and
    /// their settings loaded
    pub fn plugin_registry(&self) -> anyhow::Result<PluginRegistry> {
        let mut registry = PluginRegistry::with_config(self.plugin_config()?);
        registry.register(Box::new(self.plugin()));

        let blob = self.store.get(&self.config.settings_key)?;
        registry.load_settings(blob.as_ref());
        Ok(registry)
    }
}

/// Resolve a user-supplied target: an instance id or a 1-based position
pub fn resolve_target(registry: &Registry, target: &str) -> Result<Instance, Error> {
    let instances = registry.list();
    if let Some(found) = instances.iter().find(|i| i.id == target) {
        return Ok(found.clone());
    }

    target
        .parse::<usize>()
        .ok()
        .and_then(|pos| pos.checked_sub(1))
        .and_then(|idx| instances.get(idx))
        .cloned()
        .ok_or_else(|| Error::not_found(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use printlink_core::InstanceDraft;

    #[test]
    fn test_resolve_target_by_id_and_position() {
        let temp = tempfile::TempDir::new().unwrap();
        let app = App::with_paths(Paths::with_root(temp.path()));
        let plugin = app.plugin();
        let registry = plugin.registry();

        let a = registry.add(InstanceDraft::new("A", "http://a", "", false));
        let b = registry.add(InstanceDraft::new("B", "http://b", "", false));

        assert_eq!(resolve_target(registry, &a.id).unwrap().id, a.id);
        assert_eq!(resolve_target(registry, "2").unwrap().id, b.id);
        assert!(matches!(
            resolve_target(registry, "0"),
            Err(Error::RecordNotFound { .. })
        ));
        assert!(matches!(
            resolve_target(registry, "3"),
            Err(Error::RecordNotFound { .. })
        ));
        assert!(resolve_target(registry, "nope").is_err());
    }

    #[test]
    fn test_plugin_registry_registers_octoprint() {
        let temp = tempfile::TempDir::new().unwrap();
        let app = App::with_paths(Paths::with_root(temp.path()));

        let registry = app.plugin_registry().unwrap();
        let plugins = registry.list();
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins[0].id, "octoprint");
        assert!(plugins[0].enabled);

        // Loading settings created the bucket
        assert!(app.paths.settings_file().exists());
    }
}
