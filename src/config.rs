//! Configuration management for Course4Me
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    CONFIG_GENERATED, DEFAULT_FRESH_WRITE_WINDOW_MS, DEFAULT_LIST_TTL_SECONDS, MAX_FRESH_WRITE_WINDOW_MS,
    MAX_LIST_TTL_SECONDS,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin of the REST API, e.g. "https://course4me.example.org"
    pub base_url: String,
    /// Environment variable that overrides `base_url` when set
    pub base_url_env: String,
    /// Environment variable holding a bearer token, used when the session has none
    pub token_env: String,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long list caches stay valid, in seconds
    pub list_ttl_seconds: u64,
    /// How long a just-written course entry is served without refetching, in milliseconds
    pub fresh_write_window_ms: u64,
    /// SQLite file for the persistent cache (defaults to the XDG data directory)
    pub database_path: Option<PathBuf>,
    /// Keep the persistent cache in memory only
    pub in_memory: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging to file
    pub enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            base_url_env: "COURSE4ME_API_BASE_URL".to_string(),
            token_env: "COURSE4ME_TOKEN".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl_seconds: DEFAULT_LIST_TTL_SECONDS,
            fresh_write_window_ms: DEFAULT_FRESH_WRITE_WINDOW_MS,
            database_path: None,
            in_memory: false,
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("course4me.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("course4me").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("base_url must start with http:// or https://, got '{}'", self.api.base_url);
        }
        if self.api.base_url_env.is_empty() {
            anyhow::bail!("base_url_env cannot be empty");
        }
        if self.api.token_env.is_empty() {
            anyhow::bail!("token_env cannot be empty");
        }

        if self.cache.list_ttl_seconds == 0 || self.cache.list_ttl_seconds > MAX_LIST_TTL_SECONDS {
            anyhow::bail!(
                "list_ttl_seconds must be between 1 and {}, got {}",
                MAX_LIST_TTL_SECONDS,
                self.cache.list_ttl_seconds
            );
        }
        if self.cache.fresh_write_window_ms > MAX_FRESH_WRITE_WINDOW_MS {
            anyhow::bail!(
                "fresh_write_window_ms cannot exceed {} ({} given)",
                MAX_FRESH_WRITE_WINDOW_MS,
                self.cache.fresh_write_window_ms
            );
        }

        Ok(())
    }

    /// API origin with the environment override applied and trailing slashes removed
    pub fn resolved_base_url(&self) -> String {
        let base = std::env::var(&self.api.base_url_env)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.api.base_url.clone());
        base.trim().trim_end_matches('/').to_string()
    }

    /// Bearer token from the configured environment variable, if any
    pub fn env_token(&self) -> Option<String> {
        std::env::var(&self.api.token_env).ok().filter(|token| !token.is_empty())
    }

    /// Validity window of list caches
    pub fn list_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.list_ttl_seconds)
    }

    /// Window in which a just-written course entry is served from memory
    pub fn fresh_write_window(&self) -> Duration {
        Duration::from_millis(self.cache.fresh_write_window_ms)
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# Course4Me Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format("%Y-%m-%d")
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("course4me"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }

    /// Get the default database path for the persistent cache
    pub fn get_default_database_path() -> Result<PathBuf> {
        dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join("course4me").join("cache.db"))
    }
}
