use std::path::Path;
use tracing::debug;

use super::{global_config_path, DashboardConfig, LOCAL_CONFIG_FILE};
use crate::error::{Error, Result};

/// Layers TOML sources; later layers override earlier ones key by key
#[derive(Debug, Default)]
pub struct ConfigLoader {
    table: toml::Table,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer the user-wide config file if it exists
    pub fn load_global(&mut self) -> Result<()> {
        if let Some(path) = global_config_path() {
            self.load_optional(&path)?;
        }
        Ok(())
    }

    /// Layer a file that must exist
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        debug!("Loading configuration from {}", path.display());
        self.layer_str(&content)
    }

    /// Layer a file only if it exists
    pub fn load_optional(&mut self, path: &Path) -> Result<()> {
        if path.exists() {
            self.load_file(path)?;
        }
        Ok(())
    }

    pub fn layer_str(&mut self, content: &str) -> Result<()> {
        let overlay: toml::Table = toml::from_str(content)?;
        merge_tables(&mut self.table, overlay);
        Ok(())
    }

    /// Deserialize the layered table and apply environment overrides
    pub fn build(&self) -> Result<DashboardConfig> {
        let mut config: DashboardConfig = toml::Value::Table(self.table.clone()).try_into()?;
        config.merge_env_vars()?;
        Ok(config)
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Load configuration: defaults, global file, then `explicit` or
/// `./orderboard.toml`, then environment
pub fn load_config(explicit: Option<&Path>) -> Result<DashboardConfig> {
    let mut loader = ConfigLoader::new();
    loader.load_global()?;

    match explicit {
        Some(path) => loader.load_file(path)?,
        None => loader.load_optional(Path::new(LOCAL_CONFIG_FILE))?,
    }

    loader.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_layers_merge_nested_tables() {
        let mut loader = ConfigLoader::new();
        loader
            .layer_str(
                r#"
port = 9000
[boundaries]
feature_id_key = "properties.code"
map_title = "Regions"
"#,
            )
            .unwrap();
        loader
            .layer_str(
                r#"
title = "Orders"
[boundaries]
map_title = "States"
"#,
            )
            .unwrap();

        let config: DashboardConfig = toml::Value::Table(loader.table.clone())
            .try_into()
            .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.title, "Orders");
        assert_eq!(config.boundaries.feature_id_key, "properties.code");
        assert_eq!(config.boundaries.map_title, "States");
    }

    #[test]
    fn test_load_file_reads_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orderboard.toml");
        fs::write(&path, "top_states = 3\n").unwrap();

        let mut loader = ConfigLoader::new();
        loader.load_file(&path).unwrap();
        let config: DashboardConfig = toml::Value::Table(loader.table.clone())
            .try_into()
            .unwrap();
        assert_eq!(config.top_states, 3);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let mut loader = ConfigLoader::new();
        let result = loader.load_file(Path::new("/nonexistent/orderboard.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut loader = ConfigLoader::new();
        assert!(matches!(
            loader.layer_str("port = = 1"),
            Err(Error::Toml(_))
        ));
    }
}
