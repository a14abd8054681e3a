//! Structured context attached to every emitted line
//!
//! The request logger asks a [`ContextBuilder`] for the context once per
//! phase and hands the same context to every line of that phase. Deployments
//! swap the builder to attach their own fields, positional arguments or
//! `exc_info`.

use super::middleware::RequestId;
use axum::http::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use serde_json::{json, Map, Value};

/// Borrowed view of the request being logged.
#[derive(Debug, Clone, Copy)]
pub struct RequestHead<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    pub request_id: Option<&'a str>,
}

impl<'a> RequestHead<'a> {
    pub fn from_request<B>(request: &'a Request<B>) -> Self {
        Self {
            method: request.method(),
            uri: request.uri(),
            headers: request.headers(),
            request_id: request
                .extensions()
                .get::<RequestId>()
                .map(RequestId::as_str),
        }
    }

    /// Path plus query string, as the client sent it.
    pub fn path_and_query(&self) -> &'a str {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| self.uri.path())
    }

    pub fn describe(&self) -> Value {
        json!({
            "id": self.request_id,
            "method": self.method.as_str(),
            "path": self.path_and_query(),
        })
    }
}

/// Borrowed view of the response being logged.
#[derive(Debug, Clone, Copy)]
pub struct ResponseHead<'a> {
    pub status: StatusCode,
    pub headers: &'a HeaderMap,
}

impl<'a> ResponseHead<'a> {
    pub fn from_response<B>(response: &'a Response<B>) -> Self {
        Self {
            status: response.status(),
            headers: response.headers(),
        }
    }

    pub fn describe(&self) -> Value {
        json!({ "status": self.status.as_u16() })
    }
}

/// Extra arguments and keyword context passed along with each log line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext {
    /// Positional arguments after the message
    pub args: Vec<Value>,
    /// Structured fields
    pub extra: Map<String, Value>,
    pub exc_info: bool,
}

/// Produces the [`LogContext`] for a request or response phase.
///
/// `response` is `None` while the request is being logged. Closures with the
/// matching signature implement this trait.
pub trait ContextBuilder: Send + Sync + 'static {
    fn build(&self, request: &RequestHead<'_>, response: Option<&ResponseHead<'_>>) -> LogContext;
}

/// `{"request": {...}, "response": {...} | null}` with no positional args.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContextBuilder;

impl ContextBuilder for DefaultContextBuilder {
    fn build(&self, request: &RequestHead<'_>, response: Option<&ResponseHead<'_>>) -> LogContext {
        let mut extra = Map::new();
        extra.insert("request".to_string(), request.describe());
        extra.insert(
            "response".to_string(),
            response.map(ResponseHead::describe).unwrap_or(Value::Null),
        );
        LogContext {
            args: Vec::new(),
            extra,
            exc_info: false,
        }
    }
}

impl<F> ContextBuilder for F
where
    F: Fn(&RequestHead<'_>, Option<&ResponseHead<'_>>) -> LogContext + Send + Sync + 'static,
{
    fn build(&self, request: &RequestHead<'_>, response: Option<&ResponseHead<'_>>) -> LogContext {
        self(request, response)
    }
}
