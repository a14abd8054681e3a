//! Request/response logging orchestration

use super::body::{content_type, inspect, inspect_body, is_loggable_content_type, LoggableBody};
use super::color::{ColorRole, Colorizer};
use super::context::{ContextBuilder, DefaultContextBuilder, LogContext, RequestHead, ResponseHead};
use super::headers::format_headers;
use super::sink::{LogEntry, LogSink, TracingSink};
use crate::config::{ConfigError, LoggerConfig, RequestLoggingSettings};
use axum::http::{HeaderMap, Request, Response, StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

/// Logged instead of anything else for requests matching `skip_paths`.
pub const NO_LOGGING_MSG: &str = "No logging for this endpoint";

/// Generate a new request ID using UUID v4
///
/// # Examples
///
/// ```
/// use request_logging::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert!(!request_id.is_empty());
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Correlation ID stored in request extensions by the layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    pub fn new() -> Self {
        Self(generate_request_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logs request and response details through a [`LogSink`].
///
/// Configuration is resolved when the logger is built and never changes
/// afterwards. Both entry points only observe: the request is borrowed and
/// the response is handed back untouched.
///
/// # Example
///
/// ```
/// use request_logging::config::RequestLoggingSettings;
/// use request_logging::logging::{MemorySink, RequestLogger};
/// use axum::http::Request;
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = RequestLogger::new(&RequestLoggingSettings::default())
///     .unwrap()
///     .with_sink(sink.clone());
///
/// let request = Request::post("/somewhere")
///     .header("user-agent", "silly-human")
///     .body("some body".to_string())
///     .unwrap();
/// logger.on_request(&request);
///
/// assert!(sink.text().contains("User-Agent"));
/// assert!(sink.text().contains("some body"));
/// ```
pub struct RequestLogger {
    config: LoggerConfig,
    colorizer: Colorizer,
    sink: Arc<dyn LogSink>,
    context_builder: Arc<dyn ContextBuilder>,
}

impl RequestLogger {
    /// Resolve `settings` and build a logger writing to `tracing`.
    ///
    /// Fails on the first setting that is present but invalid.
    pub fn new(settings: &RequestLoggingSettings) -> Result<Self, ConfigError> {
        Ok(Self::from_config(settings.resolve()?))
    }

    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            colorizer: Colorizer::new(config.colorize_enabled),
            config,
            sink: Arc::new(TracingSink),
            context_builder: Arc::new(DefaultContextBuilder),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_context_builder<C: ContextBuilder>(mut self, builder: C) -> Self {
        self.context_builder = Arc::new(builder);
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Log the request line, headers and body before the handler runs.
    pub fn on_request<B>(&self, request: &Request<B>)
    where
        B: LoggableBody,
    {
        let head = RequestHead::from_request(request);
        let context = self.context_builder.build(&head, None);
        let line = format!("{} {}", head.method, head.path_and_query());

        if self.config.skip_paths.is_match(head.uri.path()) {
            self.emit(
                Level::INFO,
                &format!("{} - {}", line, NO_LOGGING_MSG),
                ColorRole::Header,
                &context,
            );
            return;
        }

        self.emit(Level::INFO, &line, ColorRole::Header, &context);
        self.log_headers(request.headers(), &context);

        let payload = request.body().payload();
        if !payload.is_empty() {
            let shown = inspect_body(
                payload,
                content_type(request.headers()),
                self.config.max_body_length,
            );
            self.emit(self.config.log_level, &shown, ColorRole::Body, &context);
        }
    }

    /// Log headers, body and status of a response and return it unchanged.
    pub fn on_response<R, B>(&self, request: &Request<R>, response: Response<B>) -> Response<B>
    where
        B: LoggableBody,
    {
        self.log_response(request, &response);
        response
    }

    fn log_response<R, B>(&self, request: &Request<R>, response: &Response<B>)
    where
        B: LoggableBody,
    {
        let head = RequestHead::from_request(request);
        if self.config.skip_paths.is_match(head.uri.path()) {
            return;
        }

        let context = self
            .context_builder
            .build(&head, Some(&ResponseHead::from_response(response)));

        self.log_headers(response.headers(), &context);

        let payload = response.body().payload();
        let loggable = content_type(response.headers()).is_some_and(is_loggable_content_type);
        if loggable && !payload.is_empty() {
            let shown = inspect(payload, self.config.max_body_length);
            self.emit(self.config.log_level, &shown, ColorRole::Body, &context);
        }

        let status = response.status();
        let line = format!(
            "{} {} - {}",
            head.method,
            head.path_and_query(),
            status.as_u16()
        );
        self.emit(
            self.status_level(status),
            &line,
            ColorRole::for_status(status),
            &context,
        );
    }

    /// Severity of the status line: 5xx are errors, 4xx use the configured
    /// level, everything else is informational.
    pub fn status_level(&self, status: StatusCode) -> Level {
        if status.is_server_error() {
            Level::ERROR
        } else if status.is_client_error() {
            self.config.http_4xx_log_level
        } else {
            Level::INFO
        }
    }

    /// An empty map still produces a (blank) header line.
    fn log_headers(&self, headers: &HeaderMap, context: &LogContext) {
        let shown = format_headers(headers, &self.config.sensitive_headers);
        self.emit(self.config.log_level, &shown, ColorRole::Header, context);
    }

    fn emit(&self, level: Level, message: &str, role: ColorRole, context: &LogContext) {
        let entry = LogEntry {
            level,
            message: self.colorizer.colorize(message, role).into_owned(),
            context: context.clone(),
        };
        self.sink.log(&entry);
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
