//! # Formwork Extract
//!
//! Request-data unification for HTTP form handling.
//!
//! This crate reads the body and query string of an HTTP request and merges
//! them into one ordered multi-value [`ValueStore`]. Handlers then read typed
//! values from the store directly or hand it to a validator.
//!
//! ## Body formats
//!
//! | Content-Type contains | Decoded by | Result |
//! |-----------------------|------------|--------|
//! | `multipart/form-data` | `multer` | values plus [`UploadedFile`]s |
//! | `form-urlencoded` | [`decode_form`] | values |
//! | `application/json` | [`flatten_json`] | one value per top-level member |
//!
//! Any other content type leaves the body unread. Query parameters
//! ([`decode_query`]) are appended after the body values, so for a key present
//! in both the body value is the one [`ValueStore::get`] returns.
//!
//! ## Example
//!
//! ```rust
//! use formwork_extract::{parse, RequestContextBuilder};
//! use http::Uri;
//!
//! # tokio_test::block_on(async {
//! let ctx = RequestContextBuilder::new()
//!     .uri(Uri::from_static("/signup?ref=newsletter"))
//!     .header("content-type", "application/json")
//!     .body(r#"{"name": "Bob", "age": 25, "retired": false}"#)
//!     .build();
//!
//! let store = parse(&ctx).await.unwrap();
//!
//! assert_eq!(store.get("name"), "Bob");
//! assert_eq!(store.get_int("age").unwrap(), 25);
//! assert!(!store.get_bool("retired").unwrap());
//! assert_eq!(store.get("ref"), "newsletter");
//! # });
//! ```
//!
//! ## Error Handling
//!
//! Parsing and the typed getters return [`FormError`], which records where
//! the failing data came from:
//!
//! ```rust
//! use formwork_extract::{ValueStore, FormErrorKind};
//!
//! let store = ValueStore::from_pairs([("age", "twenty")]);
//! let err = store.get_int("age").unwrap_err();
//!
//! assert_eq!(err.kind(), FormErrorKind::Coercion);
//! assert_eq!(err.error_code(), "COERCION_FAILED");
//! ```

#![doc(html_root_url = "https://docs.rs/formwork-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod coerce;
mod context;
mod error;
mod file;
mod form;
mod json;
mod multipart;
mod parser;
mod query;
mod store;

pub use context::{RequestContext, RequestContextBuilder};
pub use error::{ExtractionSource, FormError, FormErrorKind};
pub use file::UploadedFile;
pub use form::decode_form;
pub use json::flatten_json;
pub use parser::{
    parse, ParseConfig, Parser, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_FIELDS,
    DEFAULT_MAX_FIELD_SIZE, DEFAULT_MAX_MEMORY,
};
pub use query::decode_query;
pub use store::ValueStore;

// Re-export useful types from dependencies
pub use bytes::Bytes;
