//! OctoPrint plugin - manages printer instances and the "Send to OctoPrint…" action

use async_trait::async_trait;
use printlink_core::{parse_pick, picker_prompt, select, Config, Error, Registry, Selection};
use printlink_store::SettingsStore;
use std::sync::Arc;
use tracing::{debug, info};

use crate::base::{
    Host, HostNotifier, MenuItem, Notifier, PanelRow, Plugin, PluginSchema, SettingsPanel,
};
use crate::dispatch::{Actions, DispatchGateway, DispatchOutcome, Payload, StubTransport, Transport};

const NO_INSTANCES_MESSAGE: &str =
    "No OctoPrint instances configured. Add one in Settings → OctoPrint.";
const NOTHING_TO_SEND_MESSAGE: &str = "Nothing to send. Open a job first.";

pub struct OctoPrintPlugin {
    config: Config,
    registry: Arc<Registry>,
    gateway: DispatchGateway,
    enabled: bool,
}

impl OctoPrintPlugin {
    pub fn new(registry: Arc<Registry>, transport: Arc<dyn Transport>, config: Config) -> Self {
        Self {
            config,
            registry,
            gateway: DispatchGateway::new(transport),
            enabled: true,
        }
    }

    /// Plugin backed by `store`, using the logging-only transport
    pub fn with_store(store: Arc<dyn SettingsStore>) -> Self {
        let config = Config::new();
        let registry = Arc::new(Registry::new(store, &config));
        Self::new(registry, Arc::new(StubTransport), config)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn is_active(&self) -> bool {
        self.enabled
    }

    /// Programmatic send entry point for other collaborators
    pub fn actions(&self, notifier: Arc<dyn Notifier>) -> Actions {
        Actions::new(self.registry.clone(), self.gateway.clone(), notifier)
    }

    pub fn menu_item(&self) -> MenuItem {
        MenuItem {
            id: self.config.menu_item_id.clone(),
            label: self.config.menu_label.clone(),
            when_enabled_of: self.config.capabilities.clone(),
        }
    }

    /// Interactive send: resolve the target, ask the host to pick when there
    /// are several instances, then dispatch.
    ///
    /// Returns `Ok(None)` when the user cancels the picker.
    pub async fn send_interactive(
        &self,
        host: &dyn Host,
        payload: Payload,
        explicit: Option<&str>,
    ) -> Result<Option<DispatchOutcome>, Error> {
        let instances = self.registry.list();
        let target = match select(&instances, explicit) {
            Ok(Selection::Resolved(target)) => target,
            Ok(Selection::Ambiguous {
                candidates,
                suggested,
            }) => {
                let prompt = picker_prompt(&candidates);
                let Some(answer) = host.prompt(&prompt, &(suggested + 1).to_string()) else {
                    info!("send cancelled at picker");
                    return Ok(None);
                };
                candidates[parse_pick(&answer, candidates.len())].clone()
            }
            Err(Error::NoInstancesConfigured) => {
                host.notify(NO_INSTANCES_MESSAGE);
                return Err(Error::NoInstancesConfigured);
            }
            Err(e) => return Err(e),
        };

        let outcome = self
            .gateway
            .send(&target, &payload, &HostNotifier(host))
            .await;
        Ok(Some(outcome))
    }

    /// Current settings tab contents, read fresh from the store
    pub fn settings_panel(&self) -> SettingsPanel {
        let rows = self
            .registry
            .list()
            .iter()
            .enumerate()
            .map(|(i, instance)| PanelRow {
                position: i + 1,
                id: instance.id.clone(),
                label: instance.display_name().to_string(),
                url: instance.url.clone(),
                is_default: instance.default,
            })
            .collect();

        SettingsPanel {
            title: self.config.plugin_name.clone(),
            rows,
            add_label: format!("Add {}", self.config.plugin_name),
        }
    }
}

#[async_trait]
impl Plugin for OctoPrintPlugin {
    fn id(&self) -> &str {
        &self.config.plugin_id
    }

    fn name(&self) -> &str {
        &self.config.plugin_name
    }

    fn built_in(&self) -> bool {
        true
    }

    fn schema(&self) -> PluginSchema {
        PluginSchema {
            title: self.config.plugin_name.clone(),
            fields: Vec::new(),
        }
    }

    fn on_init(&mut self, host: &mut dyn Host) {
        host.add_menu_item(self.menu_item());
    }

    fn on_settings(&mut self, settings: Option<&serde_json::Value>) {
        let well_formed = settings
            .and_then(|s| s.get("instances"))
            .is_some_and(|i| i.is_array());
        if !well_formed {
            debug!("repairing octoprint settings shape");
            // Loading normalizes and writes the repaired bucket back
            self.registry.settings().load();
        }
    }

    fn on_enable(&mut self) {
        self.enabled = true;
    }

    fn on_disable(&mut self) {
        self.enabled = false;
    }

    fn build_settings_panel(&self) -> Option<SettingsPanel> {
        Some(self.settings_panel())
    }

    async fn on_menu_tap(&self, item_id: &str, host: &dyn Host) {
        if !self.enabled || item_id != self.config.menu_item_id {
            return;
        }

        let Some(payload) = host.current_job() else {
            host.notify(NOTHING_TO_SEND_MESSAGE);
            return;
        };

        if let Err(e) = self.send_interactive(host, payload, None).await {
            debug!(error = %e, "menu send did not complete");
        }
    }
}
