//! `multipart/form-data` body encoding.

use bytes::{BufMut, Bytes, BytesMut};

/// Boundary used when none is set.
pub const DEFAULT_BOUNDARY: &str = "formwork-test-boundary";

#[derive(Debug, Clone)]
struct Part {
    name: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// A multipart form under construction.
///
/// # Example
///
/// ```
/// use formwork_test::MultipartForm;
///
/// let form = MultipartForm::new()
///     .text("title", "Report")
///     .file("upload", "report.pdf", "application/pdf", &b"%PDF-1.7"[..]);
///
/// assert_eq!(
///     form.content_type(),
///     "multipart/form-data; boundary=formwork-test-boundary"
/// );
/// assert!(form.len() > 0);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// Creates an empty form using [`DEFAULT_BOUNDARY`].
    pub fn new() -> Self {
        Self {
            boundary: DEFAULT_BOUNDARY.to_string(),
            parts: Vec::new(),
        }
    }

    /// Uses `boundary` instead of the default.
    pub fn boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = boundary.into();
        self
    }

    /// Adds a text part.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: Some(name.into()),
            file_name: None,
            content_type: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    /// Adds a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part {
            name: Some(name.into()),
            file_name: Some(file_name.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        });
        self
    }

    /// Adds a part with no `name` parameter.
    pub fn unnamed(mut self, data: impl Into<Bytes>) -> Self {
        self.parts.push(Part {
            name: None,
            file_name: None,
            content_type: None,
            data: data.into(),
        });
        self
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if no parts were added.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The `Content-Type` header value, including the boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encodes the body.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();

        for part in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");

            buf.put_slice(b"Content-Disposition: form-data");
            if let Some(name) = &part.name {
                buf.put_slice(format!("; name=\"{name}\"").as_bytes());
            }
            if let Some(file_name) = &part.file_name {
                buf.put_slice(format!("; filename=\"{file_name}\"").as_bytes());
            }
            buf.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                buf.put_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
            }

            buf.put_slice(b"\r\n");
            buf.put_slice(&part.data);
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        buf.freeze()
    }
}
