use anyhow::Context;
use printlink_plugins::{DispatchOutcome, Payload};
use std::path::Path;
use std::sync::Arc;

use crate::app::{resolve_target, App};
use crate::host::{ConsoleNotifier, TerminalHost};

pub fn run(app: &App, file: &Path, to: Option<&str>, auto: bool) -> anyhow::Result<()> {
    let data = std::fs::read(file).with_context(|| format!("read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let payload = Payload::new(filename, data);

    let host = TerminalHost::new();
    let outcome = send(app, &host, payload, to, auto)?;
    match outcome {
        Some(outcome) => {
            outcome.into_result()?;
        }
        None => println!("Cancelled"),
    }
    Ok(())
}

/// Resolve and send; `None` means the user cancelled the picker
pub fn send(
    app: &App,
    host: &TerminalHost,
    payload: Payload,
    to: Option<&str>,
    auto: bool,
) -> anyhow::Result<Option<DispatchOutcome>> {
    if !app.plugin_config()?.is_enabled(&app.config.plugin_id) {
        anyhow::bail!(
            "the {} plugin is disabled; enable it with `printlink plugins enable {}`",
            app.config.plugin_name,
            app.config.plugin_id
        );
    }

    let plugin = app.plugin();
    let explicit = to
        .map(|target| resolve_target(plugin.registry(), target).map(|i| i.id))
        .transpose()?;

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let outcome = if auto {
        let actions = plugin.actions(Arc::new(ConsoleNotifier));
        let outcome = runtime.block_on(async {
            match explicit.as_deref() {
                Some(id) => actions.send_to(id, payload).await,
                None => actions.send(payload).await,
            }
        })?;
        Some(outcome)
    } else {
        runtime.block_on(plugin.send_interactive(host, payload, explicit.as_deref()))?
    };
    Ok(outcome)
}
