//! Request/response logging
//!
//! The pieces, leaf first:
//!
//! - [`body`]: decides whether a body is text and renders it on one line
//! - [`headers`]: renders a header map, masking sensitive values
//! - [`color`]: optional ANSI colors per fragment role
//! - [`context`]: structured context attached to each line
//! - [`sink`]: where lines go (`tracing` by default)
//! - [`middleware`]: the [`RequestLogger`] sequencing all of the above
//! - [`layer`]: the tower layer wiring the logger into an axum app

pub mod body;
pub mod color;
pub mod context;
pub mod headers;
pub mod layer;
pub mod middleware;
pub mod sink;

pub use body::{inspect, inspect_body, LoggableBody, Payload, BINARY_MARKER, STREAM_MARKER};
pub use color::{ColorRole, Colorizer, RESET};
pub use context::{ContextBuilder, DefaultContextBuilder, LogContext, RequestHead, ResponseHead};
pub use headers::format_headers;
pub use layer::{CapturedBody, RequestLoggingLayer, RequestLoggingService};
pub use middleware::{generate_request_id, RequestId, RequestLogger, NO_LOGGING_MSG};
pub use sink::{LogEntry, LogSink, MemorySink, TracingSink};
