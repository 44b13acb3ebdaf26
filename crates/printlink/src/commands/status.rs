use printlink_core::SettingsBucket;
use serde_json::{json, Value};

use crate::app::App;

pub fn run(app: &App) -> anyhow::Result<()> {
    let plugin = app.plugin();
    let bucket = plugin.registry().settings().load();

    let mut output = json!({
        "settings_file": app.paths.settings_file().display().to_string(),
        "plugin_enabled": app.plugin_config()?.is_enabled(&app.config.plugin_id),
    });
    output[app.config.plugin_id.as_str()] = redacted(&bucket);

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Bucket as JSON with API keys masked
fn redacted(bucket: &SettingsBucket) -> Value {
    let instances: Vec<Value> = bucket
        .instances
        .iter()
        .map(|i| {
            json!({
                "id": i.id,
                "name": i.name,
                "url": i.url,
                "key": redact_key(&i.key),
                "default": i.default,
            })
        })
        .collect();
    json!({ "instances": instances })
}

/// Keep a short hint of the key: first 4 chars + `***`
fn redact_key(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    if key.chars().count() > 4 {
        format!("{}***", key.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}
