//! FashionLabs configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Gender, Occasion, Preferences, Season};

/// Key the closet blob is stored under
pub const DEFAULT_CLOSET_KEY: &str = "fashionLabsCloset";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recommendation service configuration
    pub service: ServiceConfig,

    /// Local storage configuration
    pub storage: StorageConfig,

    /// Initial preference selection
    pub defaults: DefaultsConfig,

    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .fashionlabs.yml
        let local_config = PathBuf::from(".fashionlabs.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/fashionlabs/fashionlabs.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("fashionlabs").join("fashionlabs.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Recommendation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Number of alternatives to ask for per slot
    #[serde(rename = "top-k")]
    pub top_k: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 30_000,
            top_k: 5,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the key-value store
    #[serde(rename = "store-dir")]
    pub store_dir: PathBuf,

    /// Key holding the serialized closet
    #[serde(rename = "closet-key")]
    pub closet_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_dir: kvstore::config::default_store_path(),
            closet_key: DEFAULT_CLOSET_KEY.to_string(),
        }
    }
}

/// Preference selection a new session starts with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub gender: Gender,
    pub season: Season,
    pub occasion: Occasion,
}

impl DefaultsConfig {
    pub fn preferences(&self) -> Preferences {
        Preferences::new(self.gender, self.season, self.occasion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.top_k, 5);
        assert_eq!(config.storage.closet_key, "fashionLabsCloset");
        assert_eq!(config.defaults.preferences(), Preferences::default());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
service:
  base-url: https://outfits.example.com
  timeout-ms: 5000
  top-k: 8

storage:
  store-dir: /tmp/fl-store
  closet-key: myCloset

defaults:
  gender: women
  season: summer
  occasion: formal

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.service.base_url, "https://outfits.example.com");
        assert_eq!(config.service.timeout_ms, 5000);
        assert_eq!(config.service.top_k, 8);
        assert_eq!(config.storage.store_dir, PathBuf::from("/tmp/fl-store"));
        assert_eq!(config.storage.closet_key, "myCloset");
        assert_eq!(
            config.defaults.preferences(),
            Preferences::new(Gender::Women, Season::Summer, Occasion::Formal)
        );
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
service:
  top-k: 3
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.service.top_k, 3);
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.storage.closet_key, DEFAULT_CLOSET_KEY);
    }

    #[test]
    fn test_invalid_preference_rejected() {
        let yaml = r#"
defaults:
  gender: kids
"#;
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_explicit_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("fl.yml");
        fs::write(&path, "service:\n  base-url: http://10.0.0.2:9000\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.service.base_url, "http://10.0.0.2:9000");

        let missing = temp.path().join("missing.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_project_local_config() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join(".fashionlabs.yml"), "service:\n  top-k: 9\n").unwrap();

        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        let result = Config::load(None);
        std::env::set_current_dir(original).unwrap();

        assert_eq!(result.unwrap().service.top_k, 9);
    }

    /// Log sink shared with the test body
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_malformed_local_config_is_logged() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join(".fashionlabs.yml"), "service:\n  top-k: [not, a, number\n").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        let result = tracing::subscriber::with_default(subscriber, || Config::load(None));
        std::env::set_current_dir(original).unwrap();

        assert!(result.is_ok());
        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("WARN"), "no warning logged: {}", logged);
        assert!(logged.contains(".fashionlabs.yml"), "no path logged: {}", logged);
    }
}
