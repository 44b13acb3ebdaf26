//! Path resolution for settings files

use std::path::{Path, PathBuf};

/// Environment variable that overrides the data root
pub const HOME_ENV: &str = "PRINTLINK_HOME";

/// Resolves standard paths for persisted settings
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
}

impl Paths {
    /// Resolve the data root from `PRINTLINK_HOME`, falling back to `~/.printlink`
    pub fn new() -> std::io::Result<Self> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(root));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::with_root(home.join(".printlink")))
    }

    /// Use an explicit data root
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get settings.json path (the shared settings blob)
    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    /// Get plugins directory path
    pub fn plugins_dir(&self) -> PathBuf {
        self.root.join("plugins")
    }

    /// Get plugin enable/disable config path
    pub fn plugin_config_file(&self) -> PathBuf {
        self.plugins_dir().join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_paths_env_override() {
        let temp = tempfile::TempDir::new().unwrap();
        std::env::set_var(HOME_ENV, temp.path());

        let paths = Paths::new().unwrap();
        assert_eq!(paths.root(), temp.path());

        std::env::remove_var(HOME_ENV);
    }

    #[test]
    #[serial]
    fn test_paths_default_root() {
        std::env::remove_var(HOME_ENV);
        let paths = Paths::new().unwrap();
        assert!(paths.root.ends_with(".printlink"));
    }

    #[test]
    fn test_settings_file() {
        let paths = Paths::with_root("/tmp/printlink-test");
        assert!(paths.settings_file().ends_with("settings.json"));
    }

    #[test]
    fn test_plugin_config_file() {
        let paths = Paths::with_root("/tmp/printlink-test");
        let config = paths.plugin_config_file();
        assert!(config.ends_with("plugins/config.json"));
    }
}
