//! Host plugin interface and the OctoPrint plugin

pub mod base;
pub mod dispatch;
pub mod octoprint;
pub mod registry;

pub use base::{
    Host, MenuItem, Notifier, PanelRow, Plugin, PluginConfig, PluginSchema, SettingsPanel,
};
pub use dispatch::{
    Actions, DispatchError, DispatchGateway, DispatchOutcome, Payload, StubTransport, Transport,
};
pub use octoprint::OctoPrintPlugin;
pub use registry::{PluginInfo, PluginRegistry};
