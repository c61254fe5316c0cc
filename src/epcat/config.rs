use crate::error::{EpcatError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_API_URL: &str = "https://rickandmortyapi.com/graphql";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable that overrides `api_url` at startup.
pub const API_URL_ENV: &str = "EPCAT_API_URL";

/// Configuration for epcat, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpcatConfig {
    /// GraphQL endpoint serving episode pages
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout for the remote source, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for EpcatConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EpcatConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: EpcatConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Apply `EPCAT_API_URL` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api-url" => Some(self.api_url.clone()),
            "timeout" => Some(self.timeout_secs.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api-url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(EpcatError::Api(format!(
                        "api-url must be an http(s) URL, got: {}",
                        value
                    )));
                }
                self.api_url = value.to_string();
            }
            "timeout" => {
                let secs: u64 = value.parse().map_err(|_| {
                    EpcatError::Api(format!("timeout must be a whole number of seconds, got: {}", value))
                })?;
                if secs == 0 {
                    return Err(EpcatError::Api("timeout must be at least 1 second".to_string()));
                }
                self.timeout_secs = secs;
            }
            other => return Err(EpcatError::Api(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["api-url", "timeout"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = EpcatConfig::default();
        assert_eq!(config.api_url, "https://rickandmortyapi.com/graphql");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempdir().unwrap();
        let config = EpcatConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, EpcatConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();

        let mut config = EpcatConfig::default();
        config.set("timeout", "3").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = EpcatConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.timeout_secs, 3);
        assert_eq!(loaded.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{ "timeout_secs": 30 }"#).unwrap();

        let loaded = EpcatConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.timeout_secs, 30);
        assert_eq!(loaded.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = EpcatConfig::default();
        assert!(config.set("timeout", "soon").is_err());
        assert!(config.set("timeout", "0").is_err());
        assert!(config.set("api-url", "ftp://example.invalid").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, EpcatConfig::default());
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = EpcatConfig::default();
        assert_eq!(config.get("timeout").as_deref(), Some("10"));
        assert!(config.get("colour").is_none());
    }
}
