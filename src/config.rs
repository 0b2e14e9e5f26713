//! Client configuration
//!
//! Settings are resolved from built-in defaults, then an optional JSON file,
//! then environment variables. The file lives in the platform config directory
//! (`~/.config/moviecat/config.json` on Linux) unless a path is given explicitly.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::data::DEFAULT_IMAGE_BASE_URL;
use crate::retry::RetryPolicy;

/// Default TMDB REST API base
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Name of the config file inside the config directory
const CONFIG_FILE_NAME: &str = "config.json";

/// Errors that can occur while loading configuration or building a client from it
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for `Config`
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `cache_ttl_secs` is too large to represent as a duration
    #[error("cache_ttl_secs is out of range: {0}")]
    InvalidCacheTtl(u64),

    /// No API key was provided by file or environment
    #[error("TMDB API key not found. Set TMDB_API_KEY or add \"api_key\" to the config file")]
    MissingApiKey,

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Retry settings as stored in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; later attempts wait a multiple of it
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_ms: policy.base_delay.as_millis() as u64,
        }
    }
}

impl RetrySettings {
    /// Converts the stored settings into a retry policy
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

/// Settings for the movie catalog client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB API key sent as the `api_key` query parameter
    pub api_key: String,
    /// REST API base URL
    pub base_url: String,
    /// Image CDN base URL
    pub image_base_url: String,
    /// Optional `language` query parameter, e.g. "en-US"
    pub language: Option<String>,
    /// How long responses stay fresh in the cache
    pub cache_ttl_secs: u64,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Retry policy used by callers that wrap client calls
    pub retry: RetrySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: None,
            cache_ttl_secs: 300,
            request_timeout_secs: 15,
            retry: RetrySettings::default(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Search order:
    /// 1. Explicit path if provided (must exist)
    /// 2. `config.json` in the platform config directory, if present
    /// 3. Built-in defaults
    ///
    /// Environment variables are applied on top of whichever source was used.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit_path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
            None => Self::default_path().filter(|p| p.exists()),
        };

        let mut config = match path {
            Some(p) => Self::load_from_path(&p)?,
            None => Self::default(),
        };

        config.apply_env_with(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Path of the config file in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "moviecat")?;
        Some(project_dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Reads a config file, filling unspecified fields with defaults
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides using `lookup` to read variables.
    ///
    /// `MOVIECAT_API_KEY` takes precedence over `TMDB_API_KEY`.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("MOVIECAT_API_KEY").or_else(|| non_empty("TMDB_API_KEY")) {
            self.api_key = key;
        }
        if let Some(url) = non_empty("MOVIECAT_BASE_URL") {
            self.base_url = url;
        }
        if let Some(url) = non_empty("MOVIECAT_IMAGE_BASE_URL") {
            self.image_base_url = url;
        }
        if let Some(language) = non_empty("MOVIECAT_LANGUAGE") {
            self.language = Some(language);
        }
    }

    /// Returns the API key, or an error if none is configured
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        let key = self.api_key.trim();
        if key.is_empty() {
            Err(ConfigError::MissingApiKey)
        } else {
            Ok(key)
        }
    }

    /// Cache TTL as a chrono duration
    pub fn cache_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        i64::try_from(self.cache_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or(ConfigError::InvalidCacheTtl(self.cache_ttl_secs))
    }

    /// Request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
