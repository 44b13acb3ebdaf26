//! Printer instance registry, default selection and editor workflow

mod config;
pub mod editor;
mod error;
pub mod registry;
pub mod selection;
pub mod settings;
mod types;

pub use config::Config;
pub use editor::{DefaultChoice, Editor, EditorForm};
pub use error::{Error, Result};
pub use registry::{ChangeKind, Registry, RegistryEvent};
pub use selection::{parse_pick, picker_prompt, select, select_auto, Selection};
pub use settings::SettingsAdapter;
pub use types::{new_instance_id, Instance, InstanceDraft, SettingsBucket, UNNAMED_LABEL};
