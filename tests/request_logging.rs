//! Request logger behavior: bodies, headers, context, levels, colors and
//! truncation, exercised through `on_request`/`on_response` directly.

mod common;

use axum::http::{Request, Response, StatusCode};
use common::{memory_logger, multipart_with_file, plain_logger, settings};
use request_logging::logging::{
    LogContext, RequestHead, RequestLogger, ResponseHead, BINARY_MARKER, NO_LOGGING_MSG, RESET,
};
use request_logging::{ConfigError, RequestLoggingSettings};
use serde_json::{json, Map, Value};
use tracing::Level;

fn json_request(body: &str) -> Request<String> {
    Request::post("/somewhere")
        .header("content-type", "application/json")
        .body(body.to_string())
        .unwrap()
}

fn text_response(status: StatusCode, body: &str) -> Response<String> {
    Response::builder()
        .status(status)
        .header("content-type", "text/plain")
        .header("test-response-header", "response-header-value")
        .body(body.to_string())
        .unwrap()
}

fn body_entry_level(logger: &RequestLogger, sink: &request_logging::logging::MemorySink) -> Level {
    logger.on_request(&json_request(r#"{"needle":true}"#));
    sink.entries()
        .into_iter()
        .find(|entry| entry.message.contains("needle"))
        .map(|entry| entry.level)
        .expect("body line logged")
}

// =============================================================================
// Bodies and headers
// =============================================================================

#[test]
fn test_request_body_logged() {
    let (logger, sink) = plain_logger();
    logger.on_request(&json_request(r#"{"test": "some body"}"#));

    assert!(sink.text().contains("some body"));
}

#[test]
fn test_request_binary_logged() {
    let (logger, sink) = plain_logger();
    let (content_type, body) = multipart_with_file();
    let request = Request::post("/upload")
        .header("content-type", content_type)
        .body(body)
        .unwrap();

    logger.on_request(&request);

    let text = sink.text();
    assert!(text.contains(BINARY_MARKER));
    assert!(text.contains("avatar.png"));
    assert!(!text.contains("PNG"));
}

#[test]
fn test_request_headers_logged() {
    let (logger, sink) = plain_logger();
    let request = Request::get("/somewhere")
        .header("user-agent", "silly-human")
        .body(())
        .unwrap();

    logger.on_request(&request);

    assert!(sink.text().contains("User-Agent: silly-human"));
}

#[test]
fn test_sensitive_headers_masked() {
    let (logger, sink) = plain_logger();
    let request = Request::get("/somewhere")
        .header("authorization", "Bearer secret-token")
        .body(())
        .unwrap();

    logger.on_request(&request);

    let text = sink.text();
    assert!(text.contains("Authorization: *****"));
    assert!(!text.contains("secret-token"));
}

#[test]
fn test_response_headers_logged() {
    let (logger, sink) = plain_logger();
    let request = Request::get("/somewhere").body(()).unwrap();

    let response = logger.on_response(&request, text_response(StatusCode::OK, "fine"));

    assert_eq!(response.body(), "fine");
    assert!(sink
        .text()
        .contains("Test-Response-Header: response-header-value"));
}

#[test]
fn test_response_lines_in_order() {
    let (logger, sink) = plain_logger();
    let request = Request::get("/somewhere").body(()).unwrap();

    logger.on_response(&request, text_response(StatusCode::OK, "fine"));

    let messages = sink.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].contains("Content-Type: text/plain"));
    assert_eq!(messages[1], "fine");
    assert_eq!(messages[2], "GET /somewhere - 200");
}

#[test]
fn test_binary_response_body_not_logged() {
    let (logger, sink) = plain_logger();
    let request = Request::get("/image").body(()).unwrap();
    let response = Response::builder()
        .header("content-type", "image/png")
        .body(vec![0x89, b'P', b'N', b'G'])
        .unwrap();

    logger.on_response(&request, response);

    assert!(!sink.text().contains("PNG"));
    assert_eq!(sink.messages().last().unwrap(), "GET /image - 200");
}

#[test]
fn test_skipped_path_logs_single_line() {
    let (logger, sink) = memory_logger(&settings(&[
        ("disable_colorize", Value::Bool(true)),
        ("skip_paths", json!(["/health*"])),
    ]));
    let request = Request::get("/healthz").body(()).unwrap();

    logger.on_request(&request);
    logger.on_response(&request, text_response(StatusCode::OK, "ok"));

    assert_eq!(
        sink.messages(),
        vec![format!("GET /healthz - {}", NO_LOGGING_MSG)]
    );
}

// =============================================================================
// Status line levels
// =============================================================================

#[test]
fn test_status_line_levels() {
    let (logger, sink) = plain_logger();
    let request = Request::get("/somewhere").body(()).unwrap();

    for status in [StatusCode::OK, StatusCode::NOT_FOUND, StatusCode::BAD_GATEWAY] {
        logger.on_response(&request, text_response(status, ""));
    }

    let status_levels: Vec<Level> = sink
        .entries()
        .into_iter()
        .filter(|entry| entry.message.starts_with("GET /somewhere - "))
        .map(|entry| entry.level)
        .collect();
    assert_eq!(status_levels, vec![Level::INFO, Level::WARN, Level::ERROR]);
}

#[test]
fn test_custom_4xx_level() {
    let (logger, _sink) = memory_logger(&settings(&[("http_4xx_log_level", json!("error"))]));
    assert_eq!(logger.status_level(StatusCode::NOT_FOUND), Level::ERROR);
    assert_eq!(logger.status_level(StatusCode::FOUND), Level::INFO);
}

// =============================================================================
// Logging context
// =============================================================================

#[test]
fn test_request_logging_context() {
    let (logger, sink) = plain_logger();
    logger.on_request(&json_request(r#"{"a":1}"#));

    for entry in sink.entries() {
        assert!(entry.context.args.is_empty());
        assert!(!entry.context.exc_info);
        assert_eq!(entry.context.extra["request"]["method"], "POST");
        assert_eq!(entry.context.extra["request"]["path"], "/somewhere");
        assert_eq!(entry.context.extra["response"], Value::Null);
    }
}

#[test]
fn test_response_logging_context() {
    let (logger, sink) = plain_logger();
    let request = Request::get("/somewhere").body(()).unwrap();

    logger.on_response(&request, text_response(StatusCode::CREATED, "made"));

    assert!(!sink.is_empty());
    for entry in sink.entries() {
        assert_eq!(entry.context.extra["request"]["method"], "GET");
        assert_eq!(entry.context.extra["response"]["status"], 201);
    }
}

#[test]
fn test_get_logging_context_extensibility() {
    let builder = |request: &RequestHead<'_>, response: Option<&ResponseHead<'_>>| {
        let mut extra = Map::new();
        extra.insert("path".to_string(), json!(request.uri.path()));
        extra.insert(
            "status".to_string(),
            json!(response.map(|r| r.status.as_u16())),
        );
        LogContext {
            args: vec![json!("positional")],
            extra,
            exc_info: true,
        }
    };
    let (logger, sink) = plain_logger();
    let logger = logger.with_context_builder(builder);

    let request = Request::get("/custom").body(()).unwrap();
    logger.on_request(&request);
    logger.on_response(&request, text_response(StatusCode::OK, "fine"));

    let entries = sink.entries();
    assert!(entries.len() >= 2);
    for entry in &entries {
        assert_eq!(entry.context.args, vec![json!("positional")]);
        assert!(entry.context.exc_info);
        assert_eq!(entry.context.extra["path"], "/custom");
    }
    assert_eq!(entries[0].context.extra["status"], Value::Null);
    assert_eq!(entries.last().unwrap().context.extra["status"], 200);
}

// =============================================================================
// Settings: level, colors, body length
// =============================================================================

#[test]
fn test_logging_default_debug_level() {
    let (logger, sink) = plain_logger();
    assert_eq!(body_entry_level(&logger, &sink), Level::DEBUG);
}

#[test]
fn test_logging_with_customized_log_level() {
    let (logger, sink) = memory_logger(&settings(&[("data_log_level", json!("info"))]));
    assert_eq!(body_entry_level(&logger, &sink), Level::INFO);
}

#[test]
fn test_invalid_log_level() {
    let err = RequestLogger::new(&settings(&[("data_log_level", json!("super_info"))]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
    assert_eq!(err.field(), Some("data_log_level"));
}

#[test]
fn test_default_colorize() {
    let (logger, sink) = memory_logger(&RequestLoggingSettings::default());
    logger.on_request(&json_request(r#"{"a":1}"#));

    assert!(sink.messages().iter().all(|m| m.ends_with(RESET)));
}

#[test]
fn test_disable_colorize() {
    let (logger, sink) = plain_logger();
    logger.on_request(&json_request(r#"{"a":1}"#));

    assert!(!sink.is_empty());
    assert!(sink.messages().iter().all(|m| !m.contains('\x1b')));
}

#[test]
fn test_invalid_colorize() {
    let err = RequestLogger::new(&settings(&[("disable_colorize", json!("yes"))])).unwrap_err();
    assert_eq!(err.field(), Some("disable_colorize"));
}

#[test]
fn test_default_max_body_length() {
    let (logger, sink) = plain_logger();
    let body = "a".repeat(50_001);
    let request = Request::post("/somewhere")
        .header("content-type", "text/plain")
        .body(body)
        .unwrap();

    logger.on_request(&request);

    let logged = sink
        .messages()
        .into_iter()
        .find(|m| m.starts_with('a'))
        .expect("body line logged");
    assert_eq!(logged.len(), 50_000);
}

#[test]
fn test_customized_max_body_length() {
    let (logger, sink) = memory_logger(&settings(&[
        ("disable_colorize", Value::Bool(true)),
        ("max_body_length", json!(150)),
    ]));
    let request = Request::post("/somewhere")
        .header("content-type", "text/plain")
        .body("b".repeat(151))
        .unwrap();

    logger.on_request(&request);

    let logged = sink
        .messages()
        .into_iter()
        .find(|m| m.starts_with('b'))
        .expect("body line logged");
    assert_eq!(logged, "b".repeat(150));
}

#[test]
fn test_invalid_max_body_length() {
    for bad in [json!("Not an int"), json!(0), json!(-5), json!(1.5)] {
        let err = RequestLogger::new(&settings(&[("max_body_length", bad)])).unwrap_err();
        assert_eq!(err.field(), Some("max_body_length"));
    }
}
