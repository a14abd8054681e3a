//! Serve command implementation
//!
//! Runs a small echo server with the request logging layer installed, so the
//! configuration can be tried against real traffic.

use crate::cli::ServeArgs;
use crate::config::{AppConfig, LogFormat, LoggingConfig};
use crate::logging::{RequestLogger, RequestLoggingLayer};
use axum::{
    body::Body,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(args: &ServeArgs) -> anyhow::Result<AppConfig> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        AppConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        AppConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if let Some(ref level) = args.data_log_level {
        config.request_logging.data_log_level = Some(Value::String(level.clone()));
    }
    if args.no_color {
        config.request_logging.disable_colorize = Some(Value::Bool(true));
    }
    if let Some(length) = args.max_body_length {
        config.request_logging.max_body_length = Some(Value::from(length));
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Build the demo router with request logging as the outermost layer
pub fn build_demo_router(logger: RequestLogger, max_request_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/echo", post(echo))
        .route("/status/:code", get(status))
        .route("/stream", get(stream))
        .route("/health", get(|| async { "ok" }))
        .layer(RequestBodyLimitLayer::new(max_request_body_bytes))
        .layer(RequestLoggingLayer::new(logger))
}

async fn index() -> Json<Value> {
    Json(json!({
        "service": "request-logging",
        "routes": ["POST /echo", "GET /status/:code", "GET /stream", "GET /health"],
    }))
}

/// Echo the request body back with the same content type
async fn echo(headers: HeaderMap, body: axum::body::Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| header::HeaderValue::from_static("application/octet-stream"));
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (
            status,
            Json(json!({ "status": status.as_u16(), "reason": status.canonical_reason() })),
        )
            .into_response(),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("invalid status code {}", code) })),
        )
            .into_response(),
    }
}

/// Chunked response of unknown length
async fn stream() -> Response {
    let chunks = futures::stream::iter(
        ["one\n", "two\n", "three\n"]
            .into_iter()
            .map(|chunk| Ok::<_, std::io::Error>(chunk.to_string())),
    );
    (
        [(header::CONTENT_TYPE, "text/plain")],
        Body::from_stream(chunks),
    )
        .into_response()
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;

    // 2. Resolve middleware settings; invalid values stop here
    let logger_config = config.validate()?;

    // 3. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!("Starting request-logging demo server");
    tracing::debug!(?logger_config, "Resolved request logging configuration");

    let logger = RequestLogger::from_config(logger_config);
    let app = build_demo_router(logger, config.server.max_request_body_bytes);

    // 4. Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
