//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Base URL used when neither the flag, the environment, nor the config
/// file names one.
pub const DEFAULT_URL: &str = "https://apiaaspassmartbox.vercel.app";

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the switch service
    #[serde(default)]
    pub url: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("switchbox")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Resolve the service base URL: flag (or env, via clap) first, then the
/// config file, then the built-in default.
pub fn resolve_url(flag: Option<String>, config: &Config) -> String {
    flag.or_else(|| config.url.clone())
        .unwrap_or_else(|| DEFAULT_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url_prefers_flag() {
        let config = Config {
            url: Some("http://config.example".to_string()),
        };
        let result = resolve_url(Some("http://flag.example".to_string()), &config);
        assert_eq!(result, "http://flag.example");
    }

    #[test]
    fn test_resolve_url_falls_back_to_config() {
        let config = Config {
            url: Some("http://config.example".to_string()),
        };
        assert_eq!(resolve_url(None, &config), "http://config.example");
    }

    #[test]
    fn test_resolve_url_defaults() {
        assert_eq!(resolve_url(None, &Config::default()), DEFAULT_URL);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            url: Some("http://localhost:3000".to_string()),
        };
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.url.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn test_empty_config_parses() {
        let parsed: Config = toml::from_str("").unwrap();
        assert!(parsed.url.is_none());
    }
}
