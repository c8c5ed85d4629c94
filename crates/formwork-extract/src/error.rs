//! Extraction error types.
//!
//! This module provides the error type shared by request parsing and the
//! typed accessors on [`ValueStore`](crate::ValueStore), including
//! information about where the failing data came from.

use std::fmt;

/// Source of the data that failed (where it was being read from).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Request body (JSON, url-encoded form, or multipart)
    Body,
    /// A single field already stored in a [`ValueStore`](crate::ValueStore)
    Field,
    /// An uploaded file
    File,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => write!(f, "body"),
            Self::Field => write!(f, "field"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Category of a [`FormError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormErrorKind {
    /// The request body could not be read from the transport.
    TransportRead,
    /// The body or a stored field was not valid for its declared encoding.
    Decode,
    /// An uploaded file could not be read back.
    FileRead,
    /// A typed getter found a present value that does not parse.
    ///
    /// Callers are expected to validate a field's type before coercing it;
    /// hitting this means that precondition was skipped.
    Coercion,
    /// The body exceeded the configured size limit.
    PayloadTooLarge,
}

/// Error produced while parsing a request or reading typed data from a store.
///
/// # Example
///
/// ```rust
/// use formwork_extract::{ExtractionSource, FormError, FormErrorKind};
///
/// let err = FormError::coercion("age", "integer", "twenty");
/// assert_eq!(err.kind(), FormErrorKind::Coercion);
/// assert_eq!(err.extraction_source(), ExtractionSource::Field);
/// assert_eq!(err.field(), Some("age"));
/// assert!(err.to_string().contains("twenty"));
/// ```
#[derive(Debug)]
pub struct FormError {
    extraction_source: ExtractionSource,
    kind: FormErrorKind,
    field: Option<String>,
    message: String,
}

impl FormError {
    /// Creates an error for a body that could not be read.
    #[must_use]
    pub fn transport_read(details: impl fmt::Display) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: FormErrorKind::TransportRead,
            message: format!("failed to read request body: {details}"),
            field: None,
        }
    }

    /// Creates an error for malformed data in the body or query string.
    #[must_use]
    pub fn decode(source: ExtractionSource, details: impl fmt::Display) -> Self {
        Self {
            extraction_source: source,
            kind: FormErrorKind::Decode,
            message: format!("failed to decode {source}: {details}"),
            field: None,
        }
    }

    /// Creates an error for a stored field whose JSON content is malformed.
    #[must_use]
    pub fn field_decode(field: impl Into<String>, details: impl fmt::Display) -> Self {
        let field = field.into();
        Self {
            extraction_source: ExtractionSource::Field,
            kind: FormErrorKind::Decode,
            message: format!("failed to decode JSON in field '{field}': {details}"),
            field: Some(field),
        }
    }

    /// Creates an error for an uploaded file that could not be read.
    #[must_use]
    pub fn file_read(field: impl Into<String>, details: impl fmt::Display) -> Self {
        let field = field.into();
        Self {
            extraction_source: ExtractionSource::File,
            kind: FormErrorKind::FileRead,
            message: format!("failed to read uploaded file '{field}': {details}"),
            field: Some(field),
        }
    }

    /// Creates an error for a present value that cannot be coerced.
    #[must_use]
    pub fn coercion(field: impl Into<String>, expected: &str, value: &str) -> Self {
        let field = field.into();
        Self {
            extraction_source: ExtractionSource::Field,
            kind: FormErrorKind::Coercion,
            message: format!("field '{field}' holds {value:?}, which is not a valid {expected}"),
            field: Some(field),
        }
    }

    /// Creates an error for a body that's too large.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: FormErrorKind::PayloadTooLarge,
            message: format!(
                "payload too large: max {max_size} bytes, got {actual_size} bytes"
            ),
            field: None,
        }
    }

    /// Creates an error for a streamed body that crossed the size limit.
    #[must_use]
    pub fn body_limit_exceeded(max_size: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: FormErrorKind::PayloadTooLarge,
            message: format!("payload too large: body exceeds {max_size} bytes"),
            field: None,
        }
    }

    /// Creates an error for a multipart text field longer than allowed.
    #[must_use]
    pub fn field_too_large(field: impl Into<String>, max_size: usize) -> Self {
        let field = field.into();
        Self {
            extraction_source: ExtractionSource::Body,
            kind: FormErrorKind::PayloadTooLarge,
            message: format!("payload too large: field '{field}' exceeds {max_size} bytes"),
            field: Some(field),
        }
    }

    /// Creates an error for a multipart body with too many parts.
    #[must_use]
    pub fn too_many_fields(max_fields: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: FormErrorKind::PayloadTooLarge,
            message: format!("payload too large: more than {max_fields} multipart fields"),
            field: None,
        }
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> FormErrorKind {
        self.kind
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the field name if applicable.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns true if this error came from a typed getter on a malformed value.
    #[must_use]
    pub fn is_coercion(&self) -> bool {
        self.kind == FormErrorKind::Coercion
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            FormErrorKind::TransportRead => "BODY_READ_FAILED",
            FormErrorKind::Decode => "DECODE_FAILED",
            FormErrorKind::FileRead => "FILE_READ_FAILED",
            FormErrorKind::Coercion => "COERCION_FAILED",
            FormErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FormError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_read_error() {
        let err = FormError::transport_read("connection reset by peer");

        assert_eq!(err.kind(), FormErrorKind::TransportRead);
        assert_eq!(err.extraction_source(), ExtractionSource::Body);
        assert_eq!(err.field(), None);
        assert_eq!(err.error_code(), "BODY_READ_FAILED");
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_decode_error() {
        let err = FormError::decode(ExtractionSource::Body, "unexpected end of input");

        assert_eq!(err.kind(), FormErrorKind::Decode);
        assert_eq!(err.error_code(), "DECODE_FAILED");
        assert!(err.to_string().contains("body"));
        assert!(err.to_string().contains("unexpected end of input"));
    }

    #[test]
    fn test_field_decode_error() {
        let err = FormError::field_decode("location", "expected value at line 1");

        assert_eq!(err.extraction_source(), ExtractionSource::Field);
        assert_eq!(err.field(), Some("location"));
        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn test_file_read_error() {
        let err = FormError::file_read("avatar", "No such file or directory");

        assert_eq!(err.kind(), FormErrorKind::FileRead);
        assert_eq!(err.extraction_source(), ExtractionSource::File);
        assert_eq!(err.field(), Some("avatar"));
        assert_eq!(err.error_code(), "FILE_READ_FAILED");
    }

    #[test]
    fn test_coercion_error() {
        let err = FormError::coercion("age", "integer", "abc");

        assert!(err.is_coercion());
        assert_eq!(err.field(), Some("age"));
        assert_eq!(err.error_code(), "COERCION_FAILED");
        assert!(err.to_string().contains("\"abc\""));
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_payload_too_large_error() {
        let err = FormError::payload_too_large(1024, 2048);

        assert_eq!(err.kind(), FormErrorKind::PayloadTooLarge);
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("2048"));
    }

    #[test]
    fn test_multipart_limit_errors() {
        let err = FormError::field_too_large("bio", 64);
        assert_eq!(err.kind(), FormErrorKind::PayloadTooLarge);
        assert_eq!(err.field(), Some("bio"));
        assert!(err.to_string().contains("64"));

        let err = FormError::too_many_fields(2);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_extraction_source_display() {
        assert_eq!(ExtractionSource::Body.to_string(), "body");
        assert_eq!(ExtractionSource::Field.to_string(), "field");
        assert_eq!(ExtractionSource::File.to_string(), "file");
    }
}
