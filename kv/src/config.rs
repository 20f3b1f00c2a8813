//! Configuration for kvstore
//!
//! `kv` reads the `storage` section of the FashionLabs config so it opens the
//! same store directory as `fl`. Everything else in that file is ignored.

use eyre::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Store directory shared with the `fl` client by default
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fashionlabs")
        .join("store")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the store directory
    pub store_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

/// The slice of the shared config file that `kv` cares about
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SharedFile {
    storage: StorageSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StorageSection {
    #[serde(rename = "store-dir")]
    store_dir: Option<PathBuf>,
}

impl Config {
    /// Load from `path`, else `./.fashionlabs.yml`, else the user config, else defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(config_path)
                .context(format!("Failed to load config from {}", config_path.display()));
        }

        let candidates = [
            Some(PathBuf::from(".fashionlabs.yml")),
            dirs::config_dir().map(|p| p.join("fashionlabs").join("fashionlabs.yml")),
        ];

        for candidate in candidates.iter().flatten() {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(candidate) {
                Ok(config) => return Ok(config),
                Err(e) => warn!("Ignoring config {}: {:#}", candidate.display(), e),
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let file: SharedFile = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(Self {
            store_path: file.storage.store_dir.unwrap_or_else(default_store_path),
        })
    }
}
