//! Add/Edit workflow for a single instance record

use std::fmt;
use std::str::FromStr;

use crate::{Instance, InstanceDraft, Registry};

/// Two-valued "Default?" choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultChoice {
    Yes,
    #[default]
    No,
}

impl DefaultChoice {
    pub fn as_bool(self) -> bool {
        matches!(self, DefaultChoice::Yes)
    }
}

impl From<bool> for DefaultChoice {
    fn from(value: bool) -> Self {
        if value {
            DefaultChoice::Yes
        } else {
            DefaultChoice::No
        }
    }
}

impl FromStr for DefaultChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(DefaultChoice::Yes),
            "no" | "n" | "false" => Ok(DefaultChoice::No),
            other => Err(format!("expected yes or no, got `{other}`")),
        }
    }
}

impl fmt::Display for DefaultChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultChoice::Yes => write!(f, "yes"),
            DefaultChoice::No => write!(f, "no"),
        }
    }
}

/// Field values as the user sees and edits them
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EditorForm {
    pub name: String,
    pub url: String,
    pub key: String,
    pub default: DefaultChoice,
}

impl fmt::Debug for EditorForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorForm")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("key", &"***")
            .field("default", &self.default)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Add,
    Edit { id: String },
}

/// One open editor. Dropping it is a cancel; nothing is stored until `save`.
#[derive(Debug, Clone)]
pub struct Editor {
    mode: Mode,
    source: EditorForm,
}

impl Editor {
    /// Editor for a new instance; "Default?" is pre-set when the registry is empty
    pub fn add(existing: &[Instance]) -> Self {
        Self {
            mode: Mode::Add,
            source: EditorForm {
                default: existing.is_empty().into(),
                ..EditorForm::default()
            },
        }
    }

    /// Editor pre-filled from an existing instance
    pub fn edit(instance: &Instance) -> Self {
        Self {
            mode: Mode::Edit {
                id: instance.id.clone(),
            },
            source: EditorForm {
                name: instance.name.clone(),
                url: instance.url.clone(),
                key: instance.key.clone(),
                default: instance.default.into(),
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            Mode::Add => "Add OctoPrint",
            Mode::Edit { .. } => "Edit OctoPrint",
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, Mode::Edit { .. })
    }

    /// Initial field values
    pub fn form(&self) -> &EditorForm {
        &self.source
    }

    /// Turn edited fields into a candidate record
    pub fn commit(form: EditorForm) -> InstanceDraft {
        InstanceDraft {
            name: form.name.trim().to_string(),
            url: form.url.trim().to_string(),
            key: form.key.trim().to_string(),
            default: form.default.as_bool(),
        }
    }

    /// Commit the form into the registry.
    ///
    /// Returns the stored instance, or `None` when the edited instance was
    /// removed elsewhere while the editor was open.
    pub fn save(self, registry: &Registry, form: EditorForm) -> Option<Instance> {
        let draft = Self::commit(form);
        match self.mode {
            Mode::Add => Some(registry.add(draft)),
            Mode::Edit { id } => {
                if registry.update(&id, draft) {
                    registry.get(&id)
                } else {
                    None
                }
            }
        }
    }
}
