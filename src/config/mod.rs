//! Configuration module
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`REQUEST_LOGGING_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use request_logging::config::AppConfig;
//!
//! let toml = r#"
//! [request_logging]
//! max_body_length = 150
//! "#;
//! let config: AppConfig = toml::from_str(toml).unwrap();
//! let logger_config = config.request_logging.resolve().unwrap();
//! assert_eq!(logger_config.max_body_length, 150);
//! ```

pub mod error;
pub mod logging;
pub mod server;
pub mod settings;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use settings::{
    parse_level, LoggerConfig, RequestLoggingSettings, SkipPaths, DEFAULT_COLORIZE,
    DEFAULT_HTTP_4XX_LOG_LEVEL, DEFAULT_LOG_LEVEL, DEFAULT_MAX_BODY_LENGTH,
    DEFAULT_SENSITIVE_HEADERS,
};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Demo server listener
    pub server: ServerConfig,
    /// Subscriber output
    pub logging: LoggingConfig,
    /// Middleware settings, resolved by [`RequestLoggingSettings::resolve`]
    pub request_logging: RequestLoggingSettings,
}

impl AppConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Server and output settings silently keep their value when the variable
    /// does not parse. Middleware settings are stored as given and checked by
    /// [`AppConfig::validate`].
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("REQUEST_LOGGING_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("REQUEST_LOGGING_HOST") {
            self.server.host = host;
        }
        if let Ok(level) = std::env::var("REQUEST_LOGGING_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("REQUEST_LOGGING_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self.request_logging = self.request_logging.with_env_overrides();
        self
    }

    /// Validate configuration, returning the resolved middleware config.
    pub fn validate(&self) -> Result<LoggerConfig, ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        self.request_logging.resolve()
    }
}
