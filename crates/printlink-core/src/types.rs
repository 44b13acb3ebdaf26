//! Core types for printer instances

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown for instances saved without a name
pub const UNNAMED_LABEL: &str = "Unnamed";

/// Generate a fresh opaque instance id
pub fn new_instance_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// One configured remote printer endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub name: String,
    pub url: String,
    /// API key; never logged
    pub key: String,
    pub default: bool,
}

impl Instance {
    /// Build a stored record from a draft, assigning a new id
    pub fn from_draft(draft: InstanceDraft) -> Self {
        Self {
            id: new_instance_id(),
            name: draft.name,
            url: draft.url,
            key: draft.key,
            default: draft.default,
        }
    }

    /// Name for display, substituting a placeholder when empty
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNNAMED_LABEL
        } else {
            &self.name
        }
    }

    /// Overwrite the editable fields, keeping the id
    pub fn apply(&mut self, draft: InstanceDraft) {
        self.name = draft.name;
        self.url = draft.url;
        self.key = draft.key;
        self.default = draft.default;
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &self.url)
            .field("key", &"***")
            .field("default", &self.default)
            .finish()
    }
}

/// Candidate record produced by the editor, not yet stored
#[derive(Clone, Default, PartialEq, Eq)]
pub struct InstanceDraft {
    pub name: String,
    pub url: String,
    pub key: String,
    pub default: bool,
}

impl InstanceDraft {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        key: impl Into<String>,
        default: bool,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            key: key.into(),
            default,
        }
    }
}

impl From<&Instance> for InstanceDraft {
    fn from(instance: &Instance) -> Self {
        Self {
            name: instance.name.clone(),
            url: instance.url.clone(),
            key: instance.key.clone(),
            default: instance.default,
        }
    }
}

impl fmt::Debug for InstanceDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceDraft")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("key", &"***")
            .field("default", &self.default)
            .finish()
    }
}

/// Persisted plugin state: `{ "instances": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsBucket {
    pub instances: Vec<Instance>,
}

impl SettingsBucket {
    pub fn position(&self, id: &str) -> Option<usize> {
        self.instances.iter().position(|i| i.id == id)
    }

    pub fn default_instance(&self) -> Option<&Instance> {
        self.instances.iter().find(|i| i.default)
    }
}
