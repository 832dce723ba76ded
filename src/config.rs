//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::reading::{TemperatureUnit, ValueRange, MAX_DECIMALS};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reading generation and history settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default = "default_update_interval")]
    pub update_interval_secs: f64,

    #[serde(default = "default_history_max_length")]
    pub history_max_length: usize,

    #[serde(default)]
    pub value_range: ValueRange,

    #[serde(default)]
    pub unit: TemperatureUnit,

    /// Places kept on each generated Celsius value, at most `MAX_DECIMALS`.
    /// Views display [`DISPLAY_DECIMALS`](crate::views::DISPLAY_DECIMALS) places.
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_update_interval() -> f64 {
    1.0
}

fn default_history_max_length() -> usize {
    20
}

fn default_decimals() -> u32 {
    1
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: default_update_interval(),
            history_max_length: default_history_max_length(),
            value_range: ValueRange::default(),
            unit: TemperatureUnit::default(),
            decimals: default_decimals(),
        }
    }
}

impl DashboardConfig {
    /// Tick period. Falls back to the default for values `validate` rejects.
    pub fn update_interval(&self) -> Duration {
        checked_interval(self.update_interval_secs)
            .unwrap_or_else(|| Duration::from_secs_f64(default_update_interval()))
    }

    /// Reject settings the generator or timer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if checked_interval(self.update_interval_secs).is_none() {
            return Err(ConfigError::Invalid(format!(
                "update_interval_secs must be a positive number of seconds that fits a timer, got {}",
                self.update_interval_secs
            )));
        }
        if self.history_max_length == 0 {
            return Err(ConfigError::Invalid(
                "history_max_length must be at least 1".to_string(),
            ));
        }
        if !self.value_range.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "value_range {} must be finite with min <= max",
                self.value_range
            )));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "decimals must be at most {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }
        Ok(())
    }
}

/// Non-zero `Duration` for `secs`, or `None` if it is not representable
fn checked_interval(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|interval| !interval.is_zero())
}

/// HTTP/WebSocket server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_sessions() -> usize {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_sessions: default_max_sessions(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
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

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
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

        config.dashboard.validate()?;
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
        config.dashboard.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// A config file that exists but cannot be read, parsed or validated is
    /// an error; defaults are used only when no file is present.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("live-dashboard").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file in `paths`, or environment-only defaults
    pub fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        if let Some(path) = paths.iter().find(|path| path.exists()) {
            let config = Self::load_with_env(path)?;
            tracing::info!("Loaded config from {:?}", path);
            return Ok(config);
        }

        tracing::info!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Dashboard overrides
        if let Some(secs) = env_parse("LIVE_DASHBOARD_UPDATE_INTERVAL") {
            self.dashboard.update_interval_secs = secs;
        }
        if let Some(len) = env_parse("LIVE_DASHBOARD_HISTORY_LENGTH") {
            self.dashboard.history_max_length = len;
        }

        // Server overrides
        if let Ok(host) = std::env::var("LIVE_DASHBOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("LIVE_DASHBOARD_PORT") {
            self.server.port = port;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("LIVE_DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LIVE_DASHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key = %key, value = %raw, "Ignoring unparseable environment override");
            None
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

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Live Dashboard Configuration
#
# Environment variables override these settings:
# - LIVE_DASHBOARD_UPDATE_INTERVAL
# - LIVE_DASHBOARD_HISTORY_LENGTH
# - LIVE_DASHBOARD_HOST
# - LIVE_DASHBOARD_PORT
# - LIVE_DASHBOARD_LOG_LEVEL
# - LIVE_DASHBOARD_LOG_FORMAT

[dashboard]
# Seconds between readings
update_interval_secs = 1.0

# Readings kept in the rolling window
history_max_length = 20

# Display unit: fahrenheit or celsius
unit = "fahrenheit"

# Decimal places generated values are rounded to
decimals = 1

# Generated values are drawn uniformly from [min, max] degrees Celsius
[dashboard.value_range]
min = 0.0
max = 5.0

[server]
# Server host
host = "127.0.0.1"

# Server port
port = 8000

# Concurrent dashboard sessions allowed (one per browser tab)
max_sessions = 100

# Allowed CORS origins (empty = permissive)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
