//! CLI module
//!
//! # Commands
//!
//! - `serve` - Run a demo server with request logging installed
//! - `config init` - Write an example configuration file
//! - `config check` - Resolve and print the effective configuration
//!
//! # Example
//!
//! ```bash
//! # Serve with the defaults, logging bodies at info level
//! request-logging serve --data-log-level info
//!
//! # Fail fast on a bad setting
//! REQUEST_LOGGING_MAX_BODY_LENGTH=lots request-logging config check
//! ```

pub mod config;
pub mod output;
pub mod serve;

pub use config::{handle_config_check, handle_config_init};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// request-logging - HTTP request/response logging middleware
#[derive(Parser, Debug)]
#[command(
    name = "request-logging",
    version,
    about = "Log HTTP request and response details for debugging"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the demo server
    Serve(ServeArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "request-logging.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "REQUEST_LOGGING_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "REQUEST_LOGGING_HOST")]
    pub host: Option<String>,

    /// Subscriber filter (trace, debug, info, warn, error)
    #[arg(short, long, env = "REQUEST_LOGGING_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Severity of header and body lines
    #[arg(long)]
    pub data_log_level: Option<String>,

    /// Disable ANSI colors in logged lines
    #[arg(long)]
    pub no_color: bool,

    /// Truncate logged bodies to this many characters
    #[arg(long)]
    pub max_body_length: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init(ConfigInitArgs),
    /// Validate configuration and print the resolved values
    Check(ConfigCheckArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "request-logging.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigCheckArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "request-logging.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
