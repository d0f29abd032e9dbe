//! Configuration file parsing
//!
//! Supports a TOML file with the following sections:
//! - [api] - Catalog/resolver base URL and optional request timeout
//! - [display] - Table rendering options
//! - [names] - Friendly display names for material keys

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::names::FriendlyNames;

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub display: DisplaySection,

    /// Material key -> display name overrides
    #[serde(default)]
    pub names: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means requests may wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct DisplaySection {
    /// Show `Error` in a row's breakdown cells when its resolution fails,
    /// instead of rendering the failure as an empty breakdown
    #[serde(default)]
    pub surface_resolver_errors: bool,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from the default location if that
    /// file exists, else use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.api.timeout_secs == Some(0) {
            anyhow::bail!("api.timeout_secs must be greater than zero");
        }

        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid api.base_url: {}", self.api.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("api.base_url must be http or https, got '{}'", url.scheme());
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }

    pub fn friendly_names(&self) -> FriendlyNames {
        FriendlyNames::with_overrides(self.names.clone())
    }
}

/// `<config_dir>/recipe-calculator/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("recipe-calculator").join("config.toml"))
}
