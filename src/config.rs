//! Application configuration

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// Overrides `base_url` when set.
pub const BASE_URL_ENV: &str = "DOC_UPLOADER_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the document service, e.g. `http://localhost:5000`
    pub base_url: String,
    pub endpoints: EndpointConfig,
    /// Extra headers sent with every request (auth tokens and the like)
    pub headers: BTreeMap<String, String>,
    /// One of `trace`, `debug`, `info`, `warn`, `error`, `off`
    pub log_level: String,
}

/// Paths of the four store endpoints, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub list: String,
    pub upload: String,
    /// The document identifier is appended as one more path segment.
    pub delete: String,
    pub delete_all: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            endpoints: EndpointConfig::default(),
            headers: BTreeMap::new(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            list: "/getdata".to_string(),
            upload: "/upload".to_string(),
            delete: "/delete".to_string(),
            delete_all: "/deleteall".to_string(),
        }
    }
}

impl AppConfig {
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "docuploader", "DocUploader")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads the config file from the platform config directory, falling
    /// back to defaults when there is none, then applies the environment.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_override(std::env::var(BASE_URL_ENV).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn apply_env_override(&mut self, base_url: Option<String>) {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
    }

    /// Unknown levels fall back to `INFO`.
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or(LevelFilter::INFO)
    }
}
