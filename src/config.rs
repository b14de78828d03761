//! Application configuration.
//!
//! Read from `<config dir>/codevault/config.toml`. Every key is optional:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/codevault"
//! store_key = "codevault_snippets"
//! export_dir = "/home/me/Downloads"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::DEFAULT_STORE_KEY;

const APP_DIR: &str = "codevault";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the persisted collection
    pub data_dir: PathBuf,
    /// Key (file stem) the collection is stored under
    pub store_key: String,
    /// Where `export` writes backup files
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        let export_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            data_dir,
            store_key: DEFAULT_STORE_KEY.to_string(),
            export_dir,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Loads the user's config file, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config TOML")?;
        if config.store_key.trim().is_empty() {
            anyhow::bail!("store_key must not be empty");
        }
        Ok(config)
    }
}
