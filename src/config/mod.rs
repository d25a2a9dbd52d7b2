use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod loader;

pub use loader::{load_config, ConfigLoader};

use crate::analytics::ViewOptions;
use crate::error::{Error, Result};
use crate::geo::{BoundarySource, DEFAULT_BOUNDARIES_URL, DEFAULT_FEATURE_ID_KEY};

/// Name of the per-directory configuration file
pub const LOCAL_CONFIG_FILE: &str = "orderboard.toml";

/// Path of the user-wide configuration file, if a home directory exists
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "orderboard", "orderboard")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub title: String,
    pub log_level: Option<String>,
    pub fill_missing_days: bool,
    pub best_categories: usize,
    pub worst_categories: usize,
    pub top_states: usize,
    pub boundaries: BoundaryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub enabled: bool,
    pub url: String,
    /// Local GeoJSON file; takes precedence over `url`
    pub path: Option<PathBuf>,
    pub feature_id_key: String,
    pub map_title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("all_data.csv"),
            host: "127.0.0.1".to_string(),
            port: 8501,
            title: "Brazil E-commerce Dashboard".to_string(),
            log_level: Some("info".to_string()),
            fill_missing_days: false,
            best_categories: 5,
            worst_categories: 5,
            top_states: 10,
            boundaries: BoundaryConfig::default(),
        }
    }
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_BOUNDARIES_URL.to_string(),
            path: None,
            feature_id_key: DEFAULT_FEATURE_ID_KEY.to_string(),
            map_title: "Map of Item Orders Occurrences by State (Brazil) 2017".to_string(),
        }
    }
}

impl BoundaryConfig {
    /// Where to load boundaries from, or `None` when the map is disabled
    pub fn source(&self) -> Option<BoundarySource> {
        if !self.enabled {
            return None;
        }
        Some(match &self.path {
            Some(path) => BoundarySource::File(path.clone()),
            None => BoundarySource::Url(self.url.clone()),
        })
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `ORDERBOARD_*` overrides from the process environment
    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("ORDERBOARD_DATA") {
            self.data_path = PathBuf::from(path);
        }

        if let Some(host) = lookup("ORDERBOARD_HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("ORDERBOARD_PORT") {
            self.port = port
                .parse()
                .map_err(|_| Error::Config(format!("ORDERBOARD_PORT is not a port: {port}")))?;
        }

        if let Some(log_level) = lookup("ORDERBOARD_LOG_LEVEL") {
            self.log_level = Some(log_level);
        }

        if let Some(url) = lookup("ORDERBOARD_BOUNDARIES_URL") {
            self.boundaries.url = url;
        }

        Ok(())
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            fill_missing_days: self.fill_missing_days,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
