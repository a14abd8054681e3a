//! ANSI colorization of logged fragments

use axum::http::StatusCode;
use colored::Color;
use std::borrow::Cow;

/// Appended after every colorized fragment.
pub const RESET: &str = "\x1b[0m";

/// What a logged fragment is, which decides its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Header,
    Body,
    /// 1xx and 2xx
    Success,
    /// 3xx
    Redirect,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
}

impl ColorRole {
    pub fn for_status(status: StatusCode) -> Self {
        if status.is_server_error() {
            ColorRole::ServerError
        } else if status.is_client_error() {
            ColorRole::ClientError
        } else if status.is_redirection() {
            ColorRole::Redirect
        } else {
            ColorRole::Success
        }
    }

    pub fn color(self) -> Color {
        match self {
            ColorRole::Header => Color::Cyan,
            ColorRole::Body => Color::Magenta,
            ColorRole::Success => Color::Green,
            ColorRole::Redirect => Color::White,
            ColorRole::ClientError => Color::Yellow,
            ColorRole::ServerError => Color::Red,
        }
    }
}

/// Wraps text in ANSI escapes, or passes it through when disabled.
///
/// The decision comes from configuration only; terminal detection and
/// `NO_COLOR` are the subscriber's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colorizer {
    enabled: bool,
}

impl Colorizer {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn colorize<'a>(&self, text: &'a str, role: ColorRole) -> Cow<'a, str> {
        if !self.enabled {
            return Cow::Borrowed(text);
        }
        Cow::Owned(format!(
            "\x1b[{}m{}{}",
            role.color().to_fg_str(),
            text,
            RESET
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_identity() {
        let colorizer = Colorizer::new(false);
        let out = colorizer.colorize("GET /", ColorRole::Header);
        assert_eq!(out, "GET /");
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_enabled_wraps_with_reset() {
        let colorizer = Colorizer::new(true);
        let out = colorizer.colorize("body", ColorRole::Body);
        assert!(out.starts_with("\x1b["));
        assert!(out.contains("body"));
        assert!(out.ends_with(RESET));
    }

    #[test]
    fn test_roles_use_distinct_colors() {
        let colorizer = Colorizer::new(true);
        let header = colorizer.colorize("x", ColorRole::Header);
        let body = colorizer.colorize("x", ColorRole::Body);
        assert_ne!(header, body);
        assert_eq!(header, "\x1b[36mx\x1b[0m");
    }

    #[test]
    fn test_status_roles() {
        assert_eq!(ColorRole::for_status(StatusCode::CONTINUE), ColorRole::Success);
        assert_eq!(ColorRole::for_status(StatusCode::OK), ColorRole::Success);
        assert_eq!(ColorRole::for_status(StatusCode::FOUND), ColorRole::Redirect);
        assert_eq!(ColorRole::for_status(StatusCode::NOT_FOUND), ColorRole::ClientError);
        assert_eq!(
            ColorRole::for_status(StatusCode::BAD_GATEWAY),
            ColorRole::ServerError
        );
    }
}
