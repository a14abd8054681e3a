//! request-logging - HTTP request/response logging middleware
//!
//! This library logs the method, path, headers and bodies of every request
//! and response passing through an axum/tower service, with optional colors,
//! sensitive header masking and pluggable structured context.
//!
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use request_logging::{RequestLoggingLayer, RequestLoggingSettings};
//!
//! # async fn hello() -> &'static str { "Hello" }
//! let settings = RequestLoggingSettings::default().with_env_overrides();
//! let layer = RequestLoggingLayer::from_settings(&settings)?;
//! let app: Router = Router::new().route("/hello", get(hello)).layer(layer);
//! # Ok::<(), request_logging::ConfigError>(())
//! ```

pub mod cli;
pub mod config;
pub mod logging;

pub use config::{ConfigError, LoggerConfig, RequestLoggingSettings};
pub use logging::{RequestLogger, RequestLoggingLayer};
