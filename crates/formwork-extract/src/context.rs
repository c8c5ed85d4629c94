//! Request context handed to the parser.
//!
//! The [`RequestContext`] is the transport-facing half of parsing: it holds the
//! method, uri, headers, and the fully collected body of one request.

use bytes::Bytes;
use http::{header, HeaderMap, Method, Uri};
use http_body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::FormError;

/// Context providing access to the parts of an HTTP request the parser reads.
///
/// # Example
///
/// ```rust
/// use formwork_extract::RequestContext;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let ctx = RequestContext::new(
///     Method::GET,
///     Uri::from_static("/search?q=rust"),
///     HeaderMap::new(),
///     Bytes::new(),
/// );
///
/// assert_eq!(ctx.method(), &Method::GET);
/// assert_eq!(ctx.query_string(), Some("q=rust"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestContext {
    /// Creates a new request context from already collected parts.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Collects the body of an `http::Request` and builds a context from it.
    ///
    /// At most `max_body_size` bytes are read; a longer body fails with a
    /// payload-too-large error, and a failing body stream with a transport
    /// read error.
    pub async fn from_request<B>(
        request: http::Request<B>,
        max_body_size: usize,
    ) -> Result<Self, FormError>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = request.into_parts();

        let collected = Limited::new(body, max_body_size)
            .collect()
            .await
            .map_err(|e| {
                if e.downcast_ref::<LengthLimitError>().is_some() {
                    FormError::body_limit_exceeded(max_body_size)
                } else {
                    tracing::warn!(error = %e, "request body stream failed");
                    FormError::transport_read(e)
                }
            })?;

        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: collected.to_bytes(),
        })
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Builder for constructing a `RequestContext`.
#[derive(Debug, Default)]
pub struct RequestContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Adds a single header. Invalid header values are ignored.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the request context.
    ///
    /// The method defaults to `POST` and the uri to `/`.
    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            method: self.method.unwrap_or(Method::POST),
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use http_body_util::{Full, StreamBody};
    use http_body::Frame;

    #[test]
    fn test_request_context_creation() {
        let ctx = RequestContext::new(
            Method::GET,
            Uri::from_static("/users?active=true"),
            HeaderMap::new(),
            Bytes::from_static(b""),
        );

        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.uri().path(), "/users");
        assert_eq!(ctx.query_string(), Some("active=true"));
        assert!(ctx.body().is_empty());
    }

    #[test]
    fn test_request_context_builder() {
        let ctx = RequestContextBuilder::new()
            .method(Method::PUT)
            .uri(Uri::from_static("/profile"))
            .header("content-type", "application/json")
            .body(r#"{"name": "Alice"}"#)
            .build();

        assert_eq!(ctx.method(), &Method::PUT);
        assert_eq!(ctx.content_type(), Some("application/json"));
        assert_eq!(ctx.body().len(), 17);
    }

    #[test]
    fn test_builder_defaults() {
        let ctx = RequestContextBuilder::new().build();

        assert_eq!(ctx.method(), &Method::POST);
        assert_eq!(ctx.uri().path(), "/");
        assert_eq!(ctx.content_type(), None);
        assert_eq!(ctx.header("missing"), None);
    }

    #[tokio::test]
    async fn test_from_request_collects_body() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/submit?page=2")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from_static(b"name=Bob")))
            .unwrap();

        let ctx = RequestContext::from_request(request, 1024).await.unwrap();

        assert_eq!(ctx.body().as_ref(), b"name=Bob");
        assert_eq!(ctx.query_string(), Some("page=2"));
        assert_eq!(
            ctx.content_type(),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[tokio::test]
    async fn test_from_request_body_limit() {
        let request = http::Request::builder()
            .uri("/")
            .body(Full::new(Bytes::from(vec![b'a'; 64])))
            .unwrap();

        let err = RequestContext::from_request(request, 16).await.unwrap_err();
        assert_eq!(err.kind(), crate::FormErrorKind::PayloadTooLarge);
    }

    #[tokio::test]
    async fn test_from_request_transport_failure() {
        let frames: Vec<Result<Frame<Bytes>, std::io::Error>> = vec![
            Ok(Frame::data(Bytes::from_static(b"name="))),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionAborted,
                "connection aborted",
            )),
        ];
        let request = http::Request::builder()
            .uri("/")
            .body(StreamBody::new(stream::iter(frames)))
            .unwrap();

        let err = RequestContext::from_request(request, 1024).await.unwrap_err();
        assert_eq!(err.kind(), crate::FormErrorKind::TransportRead);
        assert!(err.to_string().contains("connection aborted"));
    }
}
