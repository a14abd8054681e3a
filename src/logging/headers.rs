//! Header rendering

use axum::http::{HeaderMap, HeaderName};
use std::borrow::Cow;

/// Replaces the value of a sensitive header.
pub const MASK: &str = "*****";

/// Render `name: value` pairs one per line, in the order given.
pub fn format_header_lines<'a, I>(headers: I) -> String
where
    I: IntoIterator<Item = (&'a str, Cow<'a, str>)>,
{
    headers
        .into_iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a header map for the log.
///
/// Names are shown in canonical case (`User-Agent`), values of headers in
/// `sensitive` are masked, and non UTF-8 values are decoded lossily. An empty
/// map renders as an empty string.
pub fn format_headers(headers: &HeaderMap, sensitive: &[HeaderName]) -> String {
    let entries: Vec<(String, Cow<'_, str>)> = headers
        .iter()
        .map(|(name, value)| {
            let shown = if sensitive.contains(name) {
                Cow::Borrowed(MASK)
            } else {
                String::from_utf8_lossy(value.as_bytes())
            };
            (canonical_name(name.as_str()), shown)
        })
        .collect();

    format_header_lines(
        entries
            .iter()
            .map(|(name, value)| (name.as_str(), Cow::Borrowed(value.as_ref()))),
    )
}

/// `content-type` → `Content-Type`
pub fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}
