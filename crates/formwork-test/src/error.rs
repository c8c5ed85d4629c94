//! Test error types.

use std::fmt;

/// Errors that can occur while building a test request.
#[derive(Debug)]
pub enum TestError {
    /// The URI or method did not form a valid request
    RequestBuild(String),
    /// Header name or value is invalid
    InvalidHeader(String),
    /// JSON serialization failed
    Json(serde_json::Error),
    /// Form or query encoding failed
    Form(serde_urlencoded::ser::Error),
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestBuild(msg) => write!(f, "Request build error: {msg}"),
            Self::InvalidHeader(msg) => write!(f, "Invalid header: {msg}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Form(e) => write!(f, "Form encoding error: {e}"),
        }
    }
}

impl std::error::Error for TestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Form(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TestError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<serde_urlencoded::ser::Error> for TestError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        Self::Form(e)
    }
}
