//! Config command handlers

use crate::cli::output::{format_config_json, format_config_table, ConfigView};
use crate::cli::{ConfigCheckArgs, ConfigInitArgs};
use crate::config::AppConfig;
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../request-logging.example.toml");

/// Handle `request-logging config init` command
pub fn handle_config_init(args: &ConfigInitArgs) -> anyhow::Result<String> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        );
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    Ok(format!(
        "✓ Configuration file created: {}",
        args.output.display()
    ))
}

/// Handle `request-logging config check` command
///
/// A missing file means defaults; environment overrides apply as for `serve`.
pub fn handle_config_check(args: &ConfigCheckArgs) -> anyhow::Result<String> {
    let config = if args.config.exists() {
        AppConfig::load(Some(&args.config))?
    } else {
        AppConfig::default()
    }
    .with_env_overrides();

    let resolved = config.validate()?;
    let view = ConfigView::from(&resolved);

    Ok(if args.json {
        format_config_json(&view)
    } else {
        format_config_table(&view)
    })
}
