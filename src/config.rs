//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::upload::UploadTiming;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the analysis API (`/predict_risk`, `/personalized_prevention`)
    #[serde(default = "default_analysis_url")]
    pub analysis_url: String,

    /// Base URL of the auth API (`/auth/...`)
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Unset means requests may wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_analysis_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_auth_url() -> String {
    "http://localhost:5000/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            analysis_url: default_analysis_url(),
            auth_url: default_auth_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Where the result slot and credential live
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("aura").to_string_lossy().to_string())
        .unwrap_or_else(|| "./aura_data".to_string())
}

impl StorageConfig {
    /// `data_dir` with a leading `~` resolved to the home directory
    pub fn data_path(&self) -> PathBuf {
        expand_home(&self.data_dir, dirs::home_dir())
    }
}

fn expand_home(path: &str, home: Option<PathBuf>) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match home {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Upload progress and cosmetic delays
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_progress_step")]
    pub progress_step: u8,

    #[serde(default = "default_progress_cap")]
    pub progress_cap: u8,

    #[serde(default = "default_analyzing_delay")]
    pub analyzing_delay_ms: u64,

    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_ms: u64,
}

fn default_tick_interval() -> u64 {
    200
}

fn default_progress_step() -> u8 {
    10
}

fn default_progress_cap() -> u8 {
    90
}

fn default_analyzing_delay() -> u64 {
    2000
}

fn default_redirect_delay() -> u64 {
    1500
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            progress_step: default_progress_step(),
            progress_cap: default_progress_cap(),
            analyzing_delay_ms: default_analyzing_delay(),
            redirect_delay_ms: default_redirect_delay(),
        }
    }
}

impl UploadConfig {
    /// Pipeline timing. The cap is kept below 100 and the tick interval above zero.
    pub fn timing(&self) -> UploadTiming {
        UploadTiming {
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            progress_step: self.progress_step,
            progress_cap: self.progress_cap.min(99),
            analyzing_delay: Duration::from_millis(self.analyzing_delay_ms),
            redirect_delay: Duration::from_millis(self.redirect_delay_ms),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("aura").join("config.toml")),
            Some(PathBuf::from("/etc/aura/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("AURA_ANALYSIS_URL") {
            self.api.analysis_url = url;
        }
        if let Some(url) = var("AURA_AUTH_URL") {
            self.api.auth_url = url;
        }
        if let Some(data_dir) = var("AURA_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(level) = var("AURA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("AURA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# AURA Configuration
#
# Environment variables override these settings:
# - AURA_ANALYSIS_URL
# - AURA_AUTH_URL
# - AURA_DATA_DIR
# - AURA_LOG_LEVEL
# - AURA_LOG_FORMAT

[api]
# Analysis service (risk prediction, prevention plans)
analysis_url = "http://localhost:8000"

# Authentication service
auth_url = "http://localhost:5000/api"

# Request timeout in seconds (unset: wait indefinitely)
# request_timeout_secs = 60

[storage]
# Directory holding the latest analysis and the saved login
data_dir = "~/.local/share/aura"

[upload]
# Progress ticker: +progress_step every tick_interval_ms, held at progress_cap
tick_interval_ms = 200
progress_step = 10
progress_cap = 90

# How long "Analyzing" is shown after the upload completes (ms)
analyzing_delay_ms = 2000

# Pause before showing results (ms)
redirect_delay_ms = 1500

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
