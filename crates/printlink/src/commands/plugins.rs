use crate::app::App;
use crate::host::TerminalHost;

pub fn run_list(app: &App) -> anyhow::Result<()> {
    let mut registry = app.plugin_registry()?;
    let mut host = TerminalHost::new();
    registry.init_all(&mut host);

    println!("Registered Plugins");
    println!("==================");
    for plugin in registry.list() {
        let status = if plugin.enabled { "enabled" } else { "disabled" };
        let origin = if plugin.built_in { ", built-in" } else { "" };
        println!(
            "  {} ({}) v{} [{}{}]",
            plugin.name, plugin.id, plugin.version, status, origin
        );
    }

    if !host.menu().is_empty() {
        println!("\nMenu items:");
        for item in host.menu() {
            println!(
                "  {} - {} (shown for: {})",
                item.id,
                item.label,
                item.when_enabled_of.join(", ")
            );
        }
    }
    Ok(())
}

pub fn run_enable(app: &App, name: &str) -> anyhow::Result<()> {
    set_enabled(app, name, true)?;
    println!("Enabled plugin: {}", name);
    Ok(())
}

pub fn run_disable(app: &App, name: &str) -> anyhow::Result<()> {
    set_enabled(app, name, false)?;
    println!("Disabled plugin: {}", name);
    Ok(())
}

fn set_enabled(app: &App, name: &str, enabled: bool) -> anyhow::Result<()> {
    let mut registry = app.plugin_registry()?;
    let known = if enabled {
        registry.enable(name)
    } else {
        registry.disable(name)
    };
    if !known {
        anyhow::bail!("unknown plugin: {}", name);
    }
    registry.config().save(&app.paths.plugin_config_file())
}
