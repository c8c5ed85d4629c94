//! Request parsing.
//!
//! The [`Parser`] turns a request into a [`ValueStore`]. Body fields are
//! decoded according to the `Content-Type` header and appended first; url
//! query parameters are always appended after them.

use bytes::Bytes;
use http_body::Body;
use serde::{Deserialize, Serialize};

use crate::json::flatten_json;
use crate::multipart::MultipartReader;
use crate::{decode_form, decode_query, FormError, RequestContext, ValueStore};

/// Default maximum body size (50 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

/// Default in-memory budget for uploaded files (10 MB).
pub const DEFAULT_MAX_MEMORY: usize = 10 * 1024 * 1024;

/// Default maximum size of one multipart text field (10 MB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum number of multipart parts.
pub const DEFAULT_MAX_FIELDS: usize = 1000;

/// Limits applied while parsing a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Maximum body size in bytes.
    ///
    /// Applies only to bodies the parser decodes. A body with any other
    /// content type is skipped without being read or measured.
    pub max_body_size: usize,
    /// Total bytes of uploaded file content kept in memory before uploads
    /// are written to temporary files.
    pub max_memory: usize,
    /// Maximum size of one multipart text field in bytes.
    pub max_field_size: usize,
    /// Maximum number of multipart parts.
    pub max_fields: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_memory: DEFAULT_MAX_MEMORY,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

impl ParseConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the in-memory budget for uploaded files.
    #[must_use]
    pub fn max_memory(mut self, size: usize) -> Self {
        self.max_memory = size;
        self
    }

    /// Set the maximum multipart text field size.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Set the maximum number of multipart parts.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Multipart,
    UrlEncoded,
    Json,
    Other,
}

impl BodyKind {
    fn of(content_type: &str) -> Self {
        if content_type.contains(mime::MULTIPART_FORM_DATA.essence_str()) {
            Self::Multipart
        } else if content_type.contains("form-urlencoded") {
            Self::UrlEncoded
        } else if content_type.contains(mime::APPLICATION_JSON.essence_str()) {
            Self::Json
        } else {
            Self::Other
        }
    }
}

/// Unifies the body and query string of a request into one [`ValueStore`].
///
/// A parser only holds its limits, so one instance can be cloned or shared
/// across tasks.
///
/// # Example
///
/// ```rust
/// use formwork_extract::{Parser, ParseConfig, RequestContextBuilder};
/// use http::Uri;
///
/// # tokio_test::block_on(async {
/// let ctx = RequestContextBuilder::new()
///     .uri(Uri::from_static("/people?name=Query&page=2"))
///     .header("content-type", "application/x-www-form-urlencoded")
///     .body("name=Bob&age=25")
///     .build();
///
/// let store = Parser::new(ParseConfig::default()).parse(&ctx).await.unwrap();
///
/// assert_eq!(store.get("name"), "Bob");
/// assert_eq!(store.values("name").unwrap(), ["Bob", "Query"]);
/// assert_eq!(store.get_int("page").unwrap(), 2);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParseConfig,
}

impl Parser {
    /// Creates a parser with the given limits.
    #[must_use]
    pub fn new(config: ParseConfig) -> Self {
        Self { config }
    }

    /// Returns the parser's limits.
    #[must_use]
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parses an already collected request.
    ///
    /// # Errors
    ///
    /// Returns a decode error for malformed multipart, url-encoded or JSON
    /// bodies and a payload-too-large error when a limit is crossed. No
    /// partially filled store is returned on failure.
    pub async fn parse(&self, ctx: &RequestContext) -> Result<ValueStore, FormError> {
        let body = ctx.body();
        let content_type = ctx.content_type().unwrap_or_default();
        let kind = BodyKind::of(content_type);

        if kind != BodyKind::Other && body.len() > self.config.max_body_size {
            tracing::warn!(
                body_len = body.len(),
                max_body_size = self.config.max_body_size,
                "rejecting oversized request body"
            );
            return Err(FormError::payload_too_large(
                self.config.max_body_size,
                body.len(),
            ));
        }

        tracing::debug!(
            content_type,
            body_kind = ?kind,
            body_len = body.len(),
            "parsing request body"
        );

        let mut store = ValueStore::new();
        let result = match kind {
            BodyKind::Multipart => {
                let reader = MultipartReader::new(content_type, body.clone(), &self.config)?;
                reader.read_into(&mut store).await
            }
            BodyKind::UrlEncoded => decode_form(body).map(|pairs| {
                for (key, value) in pairs {
                    store.add(key, value);
                }
            }),
            BodyKind::Json => {
                store.set_json_body(body.clone());
                flatten_json(body, &mut store)
            }
            BodyKind::Other => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, code = e.error_code(), "rejecting request body");
            return Err(e);
        }

        if let Some(query) = ctx.query_string() {
            for (key, value) in decode_query(query) {
                store.add(key, value);
            }
        }

        tracing::debug!(
            fields = store.len(),
            files = store.files().count(),
            "request parsed"
        );
        Ok(store)
    }

    /// Collects the body of `request` and parses it.
    ///
    /// The body is only read when its content type is one the parser
    /// decodes; otherwise just the query string is used.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`parse`](Self::parse), returns a
    /// transport-read error when the body stream fails.
    pub async fn parse_request<B>(&self, request: http::Request<B>) -> Result<ValueStore, FormError>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let content_type = request
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if BodyKind::of(content_type) == BodyKind::Other {
            let (parts, _) = request.into_parts();
            let ctx = RequestContext::new(parts.method, parts.uri, parts.headers, Bytes::new());
            return self.parse(&ctx).await;
        }

        let ctx = RequestContext::from_request(request, self.config.max_body_size).await?;
        self.parse(&ctx).await
    }
}

/// Parses a request with the default limits.
///
/// # Errors
///
/// See [`Parser::parse`].
pub async fn parse(ctx: &RequestContext) -> Result<ValueStore, FormError> {
    Parser::default().parse(ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FormErrorKind, RequestContextBuilder};
    use http::Uri;
    use http_body_util::Full;

    fn ctx(content_type: &str, uri: &'static str, body: &'static str) -> RequestContext {
        RequestContextBuilder::new()
            .uri(Uri::from_static(uri))
            .header("content-type", content_type)
            .body(body)
            .build()
    }

    #[test]
    fn test_parse_config_default() {
        let config = ParseConfig::default();

        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert_eq!(config.max_memory, DEFAULT_MAX_MEMORY);
        assert_eq!(config.max_field_size, DEFAULT_MAX_FIELD_SIZE);
        assert_eq!(config.max_fields, DEFAULT_MAX_FIELDS);
    }

    #[test]
    fn test_parse_config_builder() {
        let config = ParseConfig::new()
            .max_body_size(100)
            .max_memory(10)
            .max_field_size(50)
            .max_fields(3);

        assert_eq!(config.max_body_size, 100);
        assert_eq!(config.max_memory, 10);
        assert_eq!(config.max_field_size, 50);
        assert_eq!(config.max_fields, 3);
    }

    #[test]
    fn test_parse_config_deserialize_partial() {
        let config: ParseConfig = serde_json::from_str(r#"{"max_fields": 5}"#).unwrap();

        assert_eq!(config.max_fields, 5);
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
    }

    #[test]
    fn test_body_kind_by_substring() {
        assert_eq!(BodyKind::of("multipart/form-data; boundary=x"), BodyKind::Multipart);
        assert_eq!(
            BodyKind::of("application/x-www-form-urlencoded; charset=utf-8"),
            BodyKind::UrlEncoded
        );
        assert_eq!(BodyKind::of("application/json; charset=utf-8"), BodyKind::Json);
        assert_eq!(BodyKind::of("text/plain"), BodyKind::Other);
        assert_eq!(BodyKind::of(""), BodyKind::Other);
    }

    #[tokio::test]
    async fn test_parse_urlencoded_with_query() {
        let ctx = ctx(
            "application/x-www-form-urlencoded",
            "/submit?name=fromQuery&page=3",
            "name=Bob&age=25",
        );

        let store = parse(&ctx).await.unwrap();

        assert_eq!(store.get("name"), "Bob");
        assert_eq!(store.values("name").unwrap(), ["Bob", "fromQuery"]);
        assert_eq!(store.get_int("age").unwrap(), 25);
        assert_eq!(store.get("page"), "3");
        assert!(store.json_body().is_none());
    }

    #[tokio::test]
    async fn test_parse_json_keeps_body() {
        let ctx = ctx("application/json", "/?extra=1", r#"{"name":"bob","age":25}"#);

        let store = parse(&ctx).await.unwrap();

        assert_eq!(store.get("name"), "bob");
        assert_eq!(store.get("extra"), "1");
        let bound: serde_json::Value = store.bind_json().unwrap().unwrap();
        assert_eq!(bound["age"], 25);
    }

    #[tokio::test]
    async fn test_parse_empty_json_body() {
        let ctx = ctx("application/json", "/", "");
        let store = parse(&ctx).await.unwrap();

        assert!(store.is_empty());
        let bound: Option<serde_json::Value> = store.bind_json().unwrap();
        assert!(bound.is_none());
    }

    #[tokio::test]
    async fn test_parse_unknown_content_type_uses_query_only() {
        let ctx = ctx("text/plain", "/?q=rust", "name=Bob");
        let store = parse(&ctx).await.unwrap();

        assert!(!store.key_exists("name"));
        assert_eq!(store.get("q"), "rust");
    }

    #[tokio::test]
    async fn test_parse_without_content_type() {
        let ctx = RequestContextBuilder::new()
            .uri(Uri::from_static("/?q=rust"))
            .body("ignored")
            .build();

        let store = parse(&ctx).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_parse_malformed_json() {
        let ctx = ctx("application/json", "/?q=1", "{not json");
        let err = parse(&ctx).await.unwrap_err();

        assert_eq!(err.kind(), FormErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_parse_malformed_urlencoded() {
        let ctx = ctx("application/x-www-form-urlencoded", "/", "name=%zz");
        let err = parse(&ctx).await.unwrap_err();

        assert_eq!(err.kind(), FormErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_parse_body_too_large() {
        let parser = Parser::new(ParseConfig::new().max_body_size(4));
        let ctx = ctx("application/x-www-form-urlencoded", "/", "name=Bob");

        let err = parser.parse(&ctx).await.unwrap_err();
        assert_eq!(err.kind(), FormErrorKind::PayloadTooLarge);
    }

    #[tokio::test]
    async fn test_limit_ignores_unread_body() {
        let parser = Parser::new(ParseConfig::new().max_body_size(4));
        let ctx = ctx("text/plain", "/?q=rust", "0123456789");

        let store = parser.parse(&ctx).await.unwrap();
        assert_eq!(store.get("q"), "rust");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_parse_request_skips_unread_body() {
        let request = http::Request::builder()
            .uri("/notes?page=2")
            .header("content-type", "text/plain")
            .body(Full::new(Bytes::from(vec![b'x'; 64])))
            .unwrap();

        let parser = Parser::new(ParseConfig::new().max_body_size(8));
        let store = parser.parse_request(request).await.unwrap();

        assert_eq!(store.get("page"), "2");
    }

    #[tokio::test]
    async fn test_parse_request() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/people?source=web")
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from_static(br#"{"name":"Alice"}"#)))
            .unwrap();

        let store = Parser::default().parse_request(request).await.unwrap();

        assert_eq!(store.get("name"), "Alice");
        assert_eq!(store.get("source"), "web");
    }

    #[tokio::test]
    async fn test_parse_request_over_limit() {
        let request = http::Request::builder()
            .uri("/")
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from(vec![b' '; 32])))
            .unwrap();

        let parser = Parser::new(ParseConfig::new().max_body_size(8));
        let err = parser.parse_request(request).await.unwrap_err();

        assert_eq!(err.kind(), FormErrorKind::PayloadTooLarge);
    }

    #[test]
    fn test_parser_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Parser>();
    }
}
