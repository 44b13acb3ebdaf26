use printlink_core::{DefaultChoice, Editor, EditorForm};

use crate::app::{resolve_target, App};

/// Fields given on the command line; `None` keeps the current value
#[derive(Debug, Default)]
pub struct FieldEdits {
    pub name: Option<String>,
    pub url: Option<String>,
    pub key: Option<String>,
    pub default: Option<DefaultChoice>,
}

pub fn run_list(app: &App) -> anyhow::Result<()> {
    let panel = app.plugin().settings_panel();

    println!("{} instances", panel.title);
    println!("==================");
    if panel.rows.is_empty() {
        println!("  none configured (add one with `printlink instances add`)");
        return Ok(());
    }
    for row in &panel.rows {
        let badge = if row.is_default { " [default]" } else { "" };
        println!("  {}. {} ({}){}", row.position, row.label, row.url, badge);
        println!("     id: {}", row.id);
    }
    Ok(())
}

pub fn run_add(app: &App, name: &str, url: &str, key: &str, default: bool) -> anyhow::Result<()> {
    let plugin = app.plugin();
    let registry = plugin.registry();

    let editor = Editor::add(&registry.list());
    let mut form = editor.form().clone();
    form.name = name.to_string();
    form.url = url.to_string();
    form.key = key.to_string();
    if default {
        form.default = DefaultChoice::Yes;
    }

    let stored = editor
        .save(registry, form)
        .ok_or_else(|| anyhow::anyhow!("instance was not stored"))?;
    println!(
        "Added {} ({}){}",
        stored.display_name(),
        stored.id,
        if stored.default { " as default" } else { "" }
    );
    Ok(())
}

pub fn run_edit(app: &App, target: &str, edits: FieldEdits) -> anyhow::Result<()> {
    let plugin = app.plugin();
    let registry = plugin.registry();
    let instance = resolve_target(registry, target)?;

    let editor = Editor::edit(&instance);
    let form = apply_edits(editor.form().clone(), edits);

    match editor.save(registry, form) {
        Some(saved) => println!("Updated {} ({})", saved.display_name(), saved.id),
        None => anyhow::bail!("instance {} was removed while editing", instance.id),
    }
    Ok(())
}

fn apply_edits(mut form: EditorForm, edits: FieldEdits) -> EditorForm {
    if let Some(name) = edits.name {
        form.name = name;
    }
    if let Some(url) = edits.url {
        form.url = url;
    }
    if let Some(key) = edits.key {
        form.key = key;
    }
    if let Some(default) = edits.default {
        form.default = default;
    }
    form
}

pub fn run_remove(app: &App, target: &str) -> anyhow::Result<()> {
    let plugin = app.plugin();
    let registry = plugin.registry();
    let instance = resolve_target(registry, target)?;

    if registry.remove(&instance.id) {
        println!("Removed {} ({})", instance.display_name(), instance.id);
    }
    Ok(())
}

pub fn run_default(app: &App, target: &str) -> anyhow::Result<()> {
    let plugin = app.plugin();
    let registry = plugin.registry();
    let instance = resolve_target(registry, target)?;

    if registry.set_default(&instance.id) {
        println!("Default is now {} ({})", instance.display_name(), instance.id);
    }
    Ok(())
}
