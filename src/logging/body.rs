//! Body inspection
//!
//! Decides whether a request or response body can be written to the log and
//! renders it as a single line. Binary content is never logged, only a marker.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap};

/// Logged in place of content that is not valid text.
pub const BINARY_MARKER: &str = "(binary data)";
/// Logged in place of a body that was not buffered.
pub const STREAM_MARKER: &str = "(data stream)";

/// A body as seen by the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// No body at all
    Empty,
    /// Already decoded text
    Text(&'a str),
    /// Raw bytes that may or may not be UTF-8
    Bytes(&'a [u8]),
    /// Opaque binary object, such as an uploaded file handle
    Binary,
    /// Body that is still a stream and was not captured
    Stream,
}

impl Payload<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Empty => true,
            Payload::Text(text) => text.is_empty(),
            Payload::Bytes(bytes) => bytes.is_empty(),
            Payload::Binary | Payload::Stream => false,
        }
    }
}

/// Body types the request logger knows how to look into.
pub trait LoggableBody {
    fn payload(&self) -> Payload<'_>;
}

impl LoggableBody for () {
    fn payload(&self) -> Payload<'_> {
        Payload::Empty
    }
}

impl LoggableBody for str {
    fn payload(&self) -> Payload<'_> {
        Payload::Text(self)
    }
}

impl LoggableBody for String {
    fn payload(&self) -> Payload<'_> {
        Payload::Text(self)
    }
}

impl LoggableBody for [u8] {
    fn payload(&self) -> Payload<'_> {
        Payload::Bytes(self)
    }
}

impl LoggableBody for Vec<u8> {
    fn payload(&self) -> Payload<'_> {
        Payload::Bytes(self)
    }
}

impl LoggableBody for Bytes {
    fn payload(&self) -> Payload<'_> {
        Payload::Bytes(self)
    }
}

/// An unbuffered axum body is a stream; its content is never read here.
impl LoggableBody for Body {
    fn payload(&self) -> Payload<'_> {
        Payload::Stream
    }
}

impl<T: LoggableBody + ?Sized> LoggableBody for &T {
    fn payload(&self) -> Payload<'_> {
        (**self).payload()
    }
}

/// Render a payload for the log.
///
/// Text is stripped of carriage returns and line feeds, then cut to the first
/// `max_length` characters. Anything that does not decode as UTF-8 becomes
/// [`BINARY_MARKER`].
pub fn inspect(payload: Payload<'_>, max_length: usize) -> String {
    match payload {
        Payload::Empty => String::new(),
        Payload::Text(text) => single_line(text, max_length),
        Payload::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => single_line(text, max_length),
            Err(_) => BINARY_MARKER.to_string(),
        },
        Payload::Binary => BINARY_MARKER.to_string(),
        Payload::Stream => STREAM_MARKER.to_string(),
    }
}

/// Like [`inspect`], but multipart bodies have their binary parts replaced
/// with [`BINARY_MARKER`] before rendering.
pub fn inspect_body(payload: Payload<'_>, content_type: Option<&str>, max_length: usize) -> String {
    let boundary = content_type.and_then(multipart_boundary);
    let raw = match payload {
        Payload::Text(text) => Some(text.as_bytes()),
        Payload::Bytes(bytes) => Some(bytes),
        _ => None,
    };

    match (raw, boundary) {
        (Some(raw), Some(boundary)) => {
            single_line(&sanitize_multipart(raw, &boundary), max_length)
        }
        _ => inspect(payload, max_length),
    }
}

/// `Content-Type` header value, if present and readable.
pub fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

/// Whether a body with this content type is text worth logging.
pub fn is_loggable_content_type(content_type: &str) -> bool {
    let essence = mime_essence(content_type);
    essence.starts_with("text/")
        || essence == "application/json"
        || essence.ends_with("+json")
        || essence == "application/xml"
        || essence.ends_with("+xml")
        || essence == "application/javascript"
        || essence == "application/x-www-form-urlencoded"
}

/// Boundary of a `multipart/form-data` content type.
pub fn multipart_boundary(content_type: &str) -> Option<String> {
    if mime_essence(content_type) != "multipart/form-data" {
        return None;
    }
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("boundary")
            .then(|| value.trim().trim_matches('"').to_string())
            .filter(|boundary| !boundary.is_empty())
    })
}

fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn single_line(text: &str, max_length: usize) -> String {
    text.chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .take(max_length)
        .collect()
}

/// Rebuild a multipart body with every non-text part replaced by the marker.
///
/// A part is binary when it declares a content type that is not loggable or
/// when its content is not UTF-8. Part headers are kept when they decode.
/// Pieces that do not parse as a part (preamble, epilogue, malformed parts)
/// are kept only if they are UTF-8.
fn sanitize_multipart(body: &[u8], boundary: &str) -> String {
    let delimiter = format!("--{}", boundary);
    split_on(body, delimiter.as_bytes())
        .into_iter()
        .map(sanitize_part)
        .collect::<Vec<_>>()
        .join(&delimiter)
}

fn sanitize_part(part: &[u8]) -> String {
    let Some(split) = header_end(part) else {
        return text_or_marker(part);
    };
    let (head, content) = part.split_at(split);
    let Ok(head) = std::str::from_utf8(head) else {
        return BINARY_MARKER.to_string();
    };

    let declared = head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-type")
            .then(|| value.trim())
    });
    let binary_type = declared.is_some_and(|ct| !is_loggable_content_type(ct));

    match std::str::from_utf8(content) {
        Ok(text) if !binary_type => format!("{}{}", head, text),
        _ => format!("{}{}\r\n", head, BINARY_MARKER),
    }
}

/// Offset just past the first blank line, which ends the part headers.
/// Bare LF line endings are accepted as well as CRLF.
fn header_end(part: &[u8]) -> Option<usize> {
    let crlf = find(part, b"\r\n\r\n").map(|at| at + 4);
    let lf = find(part, b"\n\n").map(|at| at + 2);
    crlf.into_iter().chain(lf).min()
}

fn text_or_marker(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => BINARY_MARKER.to_string(),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn split_on<'a>(mut haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut pieces = Vec::new();
    while let Some(at) = find(haystack, needle) {
        pieces.push(&haystack[..at]);
        haystack = &haystack[at + needle.len()..];
    }
    pieces.push(haystack);
    pieces
}
