use crate::app::App;

pub fn run(app: &App) -> anyhow::Result<()> {
    std::fs::create_dir_all(app.paths.root())?;

    // Loading repairs the bucket shape and writes it back
    let plugin = app.plugin();
    let bucket = plugin.registry().settings().load();

    println!(
        "✓ Settings ready at {}",
        app.paths.settings_file().display()
    );
    println!("  {} OctoPrint instance(s) configured", bucket.instances.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use printlink_store::Paths;

    #[test]
    fn test_init_creates_settings() {
        let temp = tempfile::TempDir::new().unwrap();
        let app = App::with_paths(Paths::with_root(temp.path().join("data")));

        run(&app).unwrap();

        let content = std::fs::read_to_string(app.paths.settings_file()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value["sb:settings"]["octoprint"],
            serde_json::json!({"instances": []})
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        let temp = tempfile::TempDir::new().unwrap();
        let app = App::with_paths(Paths::with_root(temp.path()));
        app.plugin()
            .registry()
            .add(printlink_core::InstanceDraft::new("A", "http://a", "k", false));

        run(&app).unwrap();
        run(&app).unwrap();
        assert_eq!(app.plugin().registry().len(), 1);
    }
}
