//! # Formwork Test
//!
//! In-memory request builders for exercising formwork parsers and validators
//! without a server.
//!
//! ## Example
//!
//! ```
//! use formwork_test::{MultipartForm, TestRequest};
//!
//! # tokio_test::block_on(async {
//! let form = MultipartForm::new()
//!     .text("title", "Quarterly report")
//!     .file("upload", "q3.pdf", "application/pdf", &b"%PDF-1.7"[..]);
//!
//! let store = TestRequest::post("/reports?draft=1")
//!     .multipart(&form)
//!     .build()
//!     .unwrap()
//!     .parse()
//!     .await
//!     .unwrap();
//!
//! assert_eq!(store.get("title"), "Quarterly report");
//! assert_eq!(store.get("draft"), "1");
//! assert!(store.file_exists("upload"));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/formwork-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod multipart;
mod request;

pub use error::TestError;
pub use multipart::{MultipartForm, DEFAULT_BOUNDARY};
pub use request::{TestRequest, TestRequestBuilder};
