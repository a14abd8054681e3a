//! Request logging settings
//!
//! Settings are kept as untyped values until [`RequestLoggingSettings::resolve`]
//! turns them into a [`LoggerConfig`]. An absent setting takes its default; a
//! setting that is present but malformed is rejected, never defaulted.

use super::ConfigError;
use axum::http::HeaderName;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::Level;

/// Severity of header and body lines when `data_log_level` is absent.
pub const DEFAULT_LOG_LEVEL: Level = Level::DEBUG;
/// Severity of 4xx status lines when `http_4xx_log_level` is absent.
pub const DEFAULT_HTTP_4XX_LOG_LEVEL: Level = Level::WARN;
pub const DEFAULT_COLORIZE: bool = true;
pub const DEFAULT_MAX_BODY_LENGTH: usize = 50_000;
pub const DEFAULT_SENSITIVE_HEADERS: &[&str] = &["authorization", "proxy-authorization"];

const DATA_LOG_LEVEL: &str = "data_log_level";
const HTTP_4XX_LOG_LEVEL: &str = "http_4xx_log_level";
const DISABLE_COLORIZE: &str = "disable_colorize";
const MAX_BODY_LENGTH: &str = "max_body_length";
const SENSITIVE_HEADERS: &str = "sensitive_headers";
const SKIP_PATHS: &str = "skip_paths";

/// Raw `[request_logging]` settings as read from TOML and the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLoggingSettings {
    /// Level name for header and body lines (e.g. "debug", "info")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_log_level: Option<Value>,
    /// Level name for 4xx status lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_4xx_log_level: Option<Value>,
    /// Boolean; `true` turns ANSI colors off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_colorize: Option<Value>,
    /// Positive integer; logged bodies are cut to this many characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_body_length: Option<Value>,
    /// List of header names whose values are masked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive_headers: Option<Value>,
    /// List of path globs that are not logged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_paths: Option<Value>,
}

impl RequestLoggingSettings {
    /// Apply `REQUEST_LOGGING_*` environment variables.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Booleans and integers are typed before being stored, so a value such as
    /// `REQUEST_LOGGING_MAX_BODY_LENGTH=lots` stays a string and fails
    /// resolution instead of being dropped.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("REQUEST_LOGGING_DATA_LOG_LEVEL") {
            self.data_log_level = Some(Value::String(level));
        }
        if let Some(level) = lookup("REQUEST_LOGGING_HTTP_4XX_LOG_LEVEL") {
            self.http_4xx_log_level = Some(Value::String(level));
        }
        if let Some(flag) = lookup("REQUEST_LOGGING_DISABLE_COLORIZE") {
            self.disable_colorize = Some(typed_env_value(&flag));
        }
        if let Some(length) = lookup("REQUEST_LOGGING_MAX_BODY_LENGTH") {
            self.max_body_length = Some(typed_env_value(&length));
        }
        if let Some(headers) = lookup("REQUEST_LOGGING_SENSITIVE_HEADERS") {
            self.sensitive_headers = Some(env_list(&headers));
        }
        if let Some(paths) = lookup("REQUEST_LOGGING_SKIP_PATHS") {
            self.skip_paths = Some(env_list(&paths));
        }
        self
    }

    /// Validate every setting and build the immutable [`LoggerConfig`].
    pub fn resolve(&self) -> Result<LoggerConfig, ConfigError> {
        let log_level = resolve_level(
            DATA_LOG_LEVEL,
            self.data_log_level.as_ref(),
            DEFAULT_LOG_LEVEL,
        )?;
        let http_4xx_log_level = resolve_level(
            HTTP_4XX_LOG_LEVEL,
            self.http_4xx_log_level.as_ref(),
            DEFAULT_HTTP_4XX_LOG_LEVEL,
        )?;

        let colorize_enabled = match &self.disable_colorize {
            None => DEFAULT_COLORIZE,
            Some(Value::Bool(disabled)) => !disabled,
            Some(other) => {
                return Err(ConfigError::invalid(
                    DISABLE_COLORIZE,
                    format!("expected a boolean, got {}", describe(other)),
                ))
            }
        };

        let max_body_length = match &self.max_body_length {
            None => DEFAULT_MAX_BODY_LENGTH,
            Some(value) => resolve_length(value)?,
        };

        let sensitive_headers = match &self.sensitive_headers {
            None => DEFAULT_SENSITIVE_HEADERS
                .iter()
                .copied()
                .map(HeaderName::from_static)
                .collect(),
            Some(value) => string_list(SENSITIVE_HEADERS, value)?
                .iter()
                .map(|name| {
                    HeaderName::from_bytes(name.trim().to_ascii_lowercase().as_bytes()).map_err(
                        |_| {
                            ConfigError::invalid(
                                SENSITIVE_HEADERS,
                                format!("'{}' is not a valid header name", name),
                            )
                        },
                    )
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        let skip_paths = match &self.skip_paths {
            None => SkipPaths::default(),
            Some(value) => SkipPaths::new(string_list(SKIP_PATHS, value)?)?,
        };

        Ok(LoggerConfig {
            log_level,
            http_4xx_log_level,
            colorize_enabled,
            max_body_length,
            sensitive_headers,
            skip_paths,
        })
    }
}

/// Resolved, validated middleware configuration.
///
/// Built once by [`RequestLoggingSettings::resolve`] and never mutated
/// afterwards, so it can be shared across request handlers without locking.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Severity for header and body lines
    pub log_level: Level,
    /// Severity for 4xx status lines
    pub http_4xx_log_level: Level,
    pub colorize_enabled: bool,
    /// Maximum number of characters of a body that reach the log
    pub max_body_length: usize,
    /// Headers whose values are replaced by a mask
    pub sensitive_headers: Vec<HeaderName>,
    pub skip_paths: SkipPaths,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            http_4xx_log_level: DEFAULT_HTTP_4XX_LOG_LEVEL,
            colorize_enabled: DEFAULT_COLORIZE,
            max_body_length: DEFAULT_MAX_BODY_LENGTH,
            sensitive_headers: DEFAULT_SENSITIVE_HEADERS
                .iter()
                .copied()
                .map(HeaderName::from_static)
                .collect(),
            skip_paths: SkipPaths::default(),
        }
    }
}

/// Compiled set of path globs excluded from logging.
#[derive(Clone)]
pub struct SkipPaths {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Default for SkipPaths {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl SkipPaths {
    pub fn new(patterns: Vec<String>) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| ConfigError::invalid(SKIP_PATHS, e.to_string()))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| ConfigError::invalid(SKIP_PATHS, e.to_string()))?;
        Ok(Self { patterns, set })
    }

    pub fn is_match(&self, path: &str) -> bool {
        !self.patterns.is_empty() && self.set.is_match(path)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl fmt::Debug for SkipPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.patterns).finish()
    }
}

/// Parse a level name. Accepts the `tracing` names plus `warning` and
/// `critical`, case-insensitively.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" | "critical" => Some(Level::ERROR),
        _ => None,
    }
}

fn resolve_level(field: &str, value: Option<&Value>, default: Level) -> Result<Level, ConfigError> {
    match value {
        None => Ok(default),
        Some(Value::String(name)) => parse_level(name)
            .ok_or_else(|| ConfigError::invalid(field, format!("unknown log level '{}'", name))),
        Some(other) => Err(ConfigError::invalid(
            field,
            format!("expected a log level name, got {}", describe(other)),
        )),
    }
}

fn resolve_length(value: &Value) -> Result<usize, ConfigError> {
    let length = match value {
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    match length.and_then(|n| usize::try_from(n).ok()) {
        Some(0) => Err(ConfigError::invalid(MAX_BODY_LENGTH, "must be greater than zero")),
        Some(n) => Ok(n),
        None => Err(ConfigError::invalid(
            MAX_BODY_LENGTH,
            format!("expected a positive integer, got {}", value),
        )),
    }
}

fn string_list(field: &str, value: &Value) -> Result<Vec<String>, ConfigError> {
    let Value::Array(items) = value else {
        return Err(ConfigError::invalid(
            field,
            format!("expected a list of strings, got {}", describe(value)),
        ));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(ConfigError::invalid(
                field,
                format!("expected a list of strings, found {}", describe(other)),
            )),
        })
        .collect()
}

fn typed_env_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(flag) = trimmed.parse::<bool>() {
        return Value::Bool(flag);
    }
    if let Ok(number) = trimmed.parse::<i64>() {
        return Value::from(number);
    }
    Value::String(raw.to_string())
}

fn env_list(raw: &str) -> Value {
    Value::Array(
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect(),
    )
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}
