//! Output formatting helpers for CLI commands

use crate::config::LoggerConfig;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Flattened view of a resolved configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConfigView {
    pub data_log_level: String,
    pub http_4xx_log_level: String,
    pub colorize: bool,
    pub max_body_length: usize,
    pub sensitive_headers: Vec<String>,
    pub skip_paths: Vec<String>,
}

impl From<&LoggerConfig> for ConfigView {
    fn from(config: &LoggerConfig) -> Self {
        Self {
            data_log_level: config.log_level.to_string().to_lowercase(),
            http_4xx_log_level: config.http_4xx_log_level.to_string().to_lowercase(),
            colorize: config.colorize_enabled,
            max_body_length: config.max_body_length,
            sensitive_headers: config
                .sensitive_headers
                .iter()
                .map(|h| h.as_str().to_string())
                .collect(),
            skip_paths: config.skip_paths.patterns().to_vec(),
        }
    }
}

/// Format a resolved configuration as a table
pub fn format_config_table(view: &ConfigView) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Setting", "Value"]);

    let colorize = if view.colorize {
        "on".green().to_string()
    } else {
        "off".yellow().to_string()
    };

    table.add_row(vec![Cell::new("data_log_level"), Cell::new(&view.data_log_level)]);
    table.add_row(vec![
        Cell::new("http_4xx_log_level"),
        Cell::new(&view.http_4xx_log_level),
    ]);
    table.add_row(vec![Cell::new("colorize"), Cell::new(colorize)]);
    table.add_row(vec![
        Cell::new("max_body_length"),
        Cell::new(view.max_body_length),
    ]);
    table.add_row(vec![
        Cell::new("sensitive_headers"),
        Cell::new(list_or_dash(&view.sensitive_headers)),
    ]);
    table.add_row(vec![
        Cell::new("skip_paths"),
        Cell::new(list_or_dash(&view.skip_paths)),
    ]);

    table.to_string()
}

/// Format a resolved configuration as JSON
pub fn format_config_json(view: &ConfigView) -> String {
    serde_json::to_string_pretty(&json!({ "request_logging": view }))
        .unwrap_or_else(|_| "{}".to_string())
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
