//! # Formwork
//!
//! **Request form data and validation for `http` services**
//!
//! Formwork reads a request's body and query string into one ordered
//! multi-value [`ValueStore`](extract::ValueStore), whatever the body format:
//!
//! - `application/x-www-form-urlencoded` forms
//! - `multipart/form-data` forms, with uploads spilled to disk past a memory limit
//! - JSON objects, flattened to top-level keys and kept for typed binding
//!
//! A [`Validator`](validate::Validator) then runs declarative checks over the
//! store and collects user-facing messages.
//!
//! ## Quick Start
//!
//! ```rust
//! use formwork::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let ctx = RequestContextBuilder::new()
//!     .uri("/signup?ref=mail".parse().unwrap())
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body("name=Bob&age=17")
//!     .build();
//!
//! let store = Parser::default().parse(&ctx).await?;
//! assert_eq!(store.get("ref"), "mail");
//! assert_eq!(store.get_int("age")?, 17);
//!
//! let mut v = store.validator();
//! v.require("name");
//! v.require("email").message("Please enter your email address.");
//! v.greater_or_equal("age", 18.0);
//!
//! assert_eq!(
//!     v.messages(),
//!     ["Please enter your email address.", "age must be greater than or equal to 18."]
//! );
//! # Ok::<(), FormError>(())
//! # }).unwrap();
//! ```
//!
//! ## Crates
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`extract`] | `formwork-extract` | parser, value store, uploads |
//! | [`validate`] | `formwork-validate` | validator and messages |
//! | [`config`] | `formwork-config` | layered configuration |
//! | [`telemetry`] | `formwork-telemetry` | logging setup |

#![doc(html_root_url = "https://docs.rs/formwork/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export request parsing
pub use formwork_extract as extract;

// Re-export validation
pub use formwork_validate as validate;

// Re-export configuration
pub use formwork_config as config;

// Re-export logging setup
pub use formwork_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use formwork::prelude::*;
///
/// let store = ValueStore::from_pairs([("name", "Ada")]);
/// let mut v = store.validator();
///
/// assert!(v.require("name").is_ok());
/// assert!(!v.has_errors());
/// ```
pub mod prelude {
    pub use formwork_extract::{
        FormError, FormErrorKind, ParseConfig, Parser, RequestContext, RequestContextBuilder,
        UploadedFile, ValueStore,
    };

    pub use formwork_validate::{Check, ValidateExt, ValidationResult, Validator};

    pub use formwork_config::{ConfigLoader, FormworkConfig};

    pub use formwork_telemetry::{init_logging, LogConfig};
}
