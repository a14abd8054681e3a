//! Shared test utilities for request-logging integration tests.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use request_logging::config::RequestLoggingSettings;
use request_logging::logging::{MemorySink, RequestLogger, RequestLoggingLayer};
use serde_json::Value;
use std::sync::Arc;

/// Multipart boundary used by [`multipart_with_file`].
pub const BOUNDARY: &str = "BoUnDaRyStRiNg";

/// Settings with the given `(key, value)` pairs set.
pub fn settings(pairs: &[(&str, Value)]) -> RequestLoggingSettings {
    let mut settings = RequestLoggingSettings::default();
    for (key, value) in pairs {
        let value = Some(value.clone());
        match *key {
            "data_log_level" => settings.data_log_level = value,
            "http_4xx_log_level" => settings.http_4xx_log_level = value,
            "disable_colorize" => settings.disable_colorize = value,
            "max_body_length" => settings.max_body_length = value,
            "sensitive_headers" => settings.sensitive_headers = value,
            "skip_paths" => settings.skip_paths = value,
            other => panic!("unknown setting {}", other),
        }
    }
    settings
}

/// Logger built from `settings` writing into a fresh memory sink.
pub fn memory_logger(settings: &RequestLoggingSettings) -> (RequestLogger, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let logger = RequestLogger::new(settings)
        .expect("valid settings")
        .with_sink(sink.clone());
    (logger, sink)
}

/// Default logger without colors, so messages can be compared verbatim.
pub fn plain_logger() -> (RequestLogger, Arc<MemorySink>) {
    memory_logger(&settings(&[("disable_colorize", Value::Bool(true))]))
}

async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| header::HeaderValue::from_static("application/octet-stream"));
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "nothing here").into_response()
}

async fn boom() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

/// Router with echo, 404, 500 and health routes behind the logging layer.
pub fn test_router(logger: RequestLogger) -> Router {
    Router::new()
        .route("/echo", post(echo))
        .route("/missing", get(not_found))
        .route("/boom", get(boom))
        .route("/health", get(|| async { "ok" }))
        .layer(RequestLoggingLayer::new(logger))
}

/// Multipart body with one text field and one binary file part.
pub fn multipart_with_file() -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"name\"\r\n\r\n");
    body.extend_from_slice(b"avatar\r\n");
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"avatar.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x00, 0xff, 0xfe, 0x01]);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body,
    )
}

pub fn post_json(path: &str, json: &str) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}
