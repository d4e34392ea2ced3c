use chrono::{FixedOffset, Offset, Utc};
use domain::models::DateRange;
use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Snapshots travel in request bodies, so this bounds the largest pass.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Defaults applied to analytics requests.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Evaluator's offset from UTC in minutes, used when a request sends none.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Range token used when a request sends none.
    #[serde(default = "default_range")]
    pub default_range: String,

    /// Number of events in the "recent events" list.
    #[serde(default = "default_recent_events_limit")]
    pub recent_events_limit: usize,

    /// Largest event list accepted in a single request.
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            default_range: default_range(),
            recent_events_limit: default_recent_events_limit(),
            max_events: default_max_events(),
        }
    }
}

impl AnalyticsConfig {
    /// Configured offset, UTC when out of range.
    pub fn offset(&self) -> FixedOffset {
        shared::time::offset_from_minutes(self.utc_offset_minutes).unwrap_or_else(|| Utc.fix())
    }

    pub fn range(&self) -> DateRange {
        DateRange::parse(&self.default_range)
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    10_485_760
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_range() -> String {
    "7d".to_string()
}
fn default_recent_events_limit() -> usize {
    5
}
fn default_max_events() -> usize {
    100_000
}

const RANGE_TOKENS: [&str; 4] = ["7d", "30d", "90d", "all"];

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with GA__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("GA").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the config directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 10485760

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [analytics]
            utc_offset_minutes = 0
            default_range = "7d"
            recent_events_limit = 5
            max_events = 100000
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "GA__SERVER__HOST must not be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.socket_addr().is_err() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "Invalid socket address {}:{}",
                self.server.host, self.server.port
            )));
        }

        if shared::validation::validate_utc_offset_minutes(self.analytics.utc_offset_minutes)
            .is_err()
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "utc_offset_minutes must be between {} and {}",
                shared::validation::MIN_UTC_OFFSET_MINUTES,
                shared::validation::MAX_UTC_OFFSET_MINUTES
            )));
        }

        let range = self.analytics.default_range.trim().to_lowercase();
        if !RANGE_TOKENS.contains(&range.as_str()) {
            return Err(ConfigValidationError::InvalidValue(format!(
                "default_range must be one of {}",
                RANGE_TOKENS.join(", ")
            )));
        }

        if self.analytics.max_events == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "max_events must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
