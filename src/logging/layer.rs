//! Tower layer that runs the [`RequestLogger`] around an axum service.
//!
//! Bodies with a known length up to [`MAX_CAPTURE_BYTES`] are buffered so they
//! can be inspected, then handed on unchanged. Anything else stays a stream
//! and is logged as `(data stream)`. Response bodies are only buffered when
//! their content type is one that gets logged.

use super::body::{content_type, is_loggable_content_type, LoggableBody, Payload};
use super::middleware::{RequestId, RequestLogger};
use crate::config::{ConfigError, RequestLoggingSettings};
use axum::body::{Body, Bytes, HttpBody};
use axum::http::{HeaderMap, Request, Response};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Largest body buffered for logging (10 MB).
pub const MAX_CAPTURE_BYTES: usize = 10 * 1024 * 1024;

/// A body that was either read into memory or left as a stream.
#[derive(Debug)]
pub enum CapturedBody {
    Buffered(Bytes),
    Streaming(Body),
}

impl CapturedBody {
    /// Read `body` into memory if its exact length is known and small enough.
    pub async fn capture(body: Body) -> Self {
        match body.size_hint().exact() {
            Some(0) => CapturedBody::Buffered(Bytes::new()),
            Some(len) if len <= MAX_CAPTURE_BYTES as u64 => {
                match axum::body::to_bytes(body, len as usize).await {
                    Ok(bytes) => CapturedBody::Buffered(bytes),
                    Err(err) => {
                        tracing::warn!(error = %err, "Failed to buffer body for logging");
                        // hand the failure on to whoever reads the body next
                        let failed = futures::stream::once(async move { Err::<Bytes, _>(err) });
                        CapturedBody::Streaming(Body::from_stream(failed))
                    }
                }
            }
            _ => CapturedBody::Streaming(body),
        }
    }

    /// Like [`capture`](Self::capture), but only for bodies whose content
    /// type is logged. Anything else is passed on without being read.
    pub async fn capture_loggable(headers: &HeaderMap, body: Body) -> Self {
        if content_type(headers).is_some_and(is_loggable_content_type) {
            Self::capture(body).await
        } else {
            CapturedBody::Streaming(body)
        }
    }

    pub fn into_body(self) -> Body {
        match self {
            CapturedBody::Buffered(bytes) => Body::from(bytes),
            CapturedBody::Streaming(body) => body,
        }
    }
}

impl LoggableBody for CapturedBody {
    fn payload(&self) -> Payload<'_> {
        match self {
            CapturedBody::Buffered(bytes) => bytes.payload(),
            CapturedBody::Streaming(_) => Payload::Stream,
        }
    }
}

/// Tower layer installing request/response logging.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{routing::get, Router};
/// use request_logging::config::RequestLoggingSettings;
/// use request_logging::logging::RequestLoggingLayer;
///
/// # async fn hello() -> &'static str { "Hello" }
/// let layer = RequestLoggingLayer::from_settings(&RequestLoggingSettings::default())
///     .expect("valid settings");
/// let app: Router = Router::new().route("/hello", get(hello)).layer(layer);
/// ```
#[derive(Debug, Clone)]
pub struct RequestLoggingLayer {
    logger: Arc<RequestLogger>,
}

impl RequestLoggingLayer {
    pub fn new(logger: RequestLogger) -> Self {
        Self {
            logger: Arc::new(logger),
        }
    }

    /// Resolve settings and build a layer logging through `tracing`.
    pub fn from_settings(settings: &RequestLoggingSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(RequestLogger::new(settings)?))
    }

    pub fn logger(&self) -> &RequestLogger {
        &self.logger
    }
}

impl<S> Layer<S> for RequestLoggingLayer {
    type Service = RequestLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggingService {
            inner,
            logger: Arc::clone(&self.logger),
        }
    }
}

/// Service created by [`RequestLoggingLayer`].
#[derive(Debug, Clone)]
pub struct RequestLoggingService<S> {
    inner: S,
    logger: Arc<RequestLogger>,
}

impl<S> Service<Request<Body>> for RequestLoggingService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response<Body>, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        // the clone is not ready yet; keep the ready service for this call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let logger = Arc::clone(&self.logger);

        if request.extensions().get::<RequestId>().is_none() {
            request.extensions_mut().insert(RequestId::new());
        }

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let request = Request::from_parts(parts, CapturedBody::capture(body).await);
            logger.on_request(&request);

            let head = request_head(&request);
            let response = inner.call(request.map(CapturedBody::into_body)).await?;

            let (parts, body) = response.into_parts();
            let body = CapturedBody::capture_loggable(&parts.headers, body).await;
            let response = Response::from_parts(parts, body);
            let response = logger.on_response(&head, response);

            Ok(response.map(CapturedBody::into_body))
        })
    }
}

/// Copy of the request line, headers and request ID, kept for the response phase.
fn request_head<B>(request: &Request<B>) -> Request<()> {
    let mut head = Request::new(());
    *head.method_mut() = request.method().clone();
    *head.uri_mut() = request.uri().clone();
    *head.version_mut() = request.version();
    *head.headers_mut() = request.headers().clone();
    if let Some(id) = request.extensions().get::<RequestId>() {
        head.extensions_mut().insert(id.clone());
    }
    head
}
