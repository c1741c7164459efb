//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// GRID API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_central_data_url")]
    pub central_data_url: String,

    #[serde(default = "default_series_state_url")]
    pub series_state_url: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retries after the first attempt on 429/5xx and rate-limit errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff base; attempt n waits base * 2^n
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_delay_ms: u64,

    /// Pause between consecutive series fetches
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// Most recent series fetched per report
    #[serde(default = "default_max_series")]
    pub max_series: usize,

    /// Series requested per tournament
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Tournaments searched for a team's series
    #[serde(default = "default_tournament_ids")]
    pub tournament_ids: Vec<String>,

    /// Tournaments tried in order when listing teams
    #[serde(default = "default_directory_tournament_ids")]
    pub directory_tournament_ids: Vec<String>,
}

fn default_api_key_env() -> String {
    "GRID_API_KEY".to_string()
}

fn default_central_data_url() -> String {
    "https://api-op.grid.gg/central-data/graphql".to_string()
}

fn default_series_state_url() -> String {
    "https://api-op.grid.gg/live-data-feed/series-state/graphql".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_ms() -> u64 {
    1000
}

fn default_request_delay() -> u64 {
    500
}

fn default_max_series() -> usize {
    10
}

fn default_page_size() -> u32 {
    50
}

fn default_tournament_ids() -> Vec<String> {
    [
        "757073", "757074", "757101", "757371", "757481", "757320", "757321", "774782", "774783",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_directory_tournament_ids() -> Vec<String> {
    ["774783", "774782", "757321", "757073"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            central_data_url: default_central_data_url(),
            series_state_url: default_series_state_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_ms(),
            request_delay_ms: default_request_delay(),
            max_series: default_max_series(),
            page_size: default_page_size(),
            tournament_ids: default_tournament_ids(),
            directory_tournament_ids: default_directory_tournament_ids(),
        }
    }
}

impl GridConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Report cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Defaults to `<data_dir>/cache`
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
}

fn default_ttl() -> u64 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl_seconds: default_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            grid: GridConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Directory holding cached reports.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("cache"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "GRID timeout must be greater than 0".to_string(),
            ));
        }

        for endpoint in [&self.grid.central_data_url, &self.grid.series_state_url] {
            url::Url::parse(endpoint).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid GRID endpoint {}: {}", endpoint, e))
            })?;
        }

        if self.grid.tournament_ids.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one tournament id is required".to_string(),
            ));
        }

        if self.cache.ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Cache TTL must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
