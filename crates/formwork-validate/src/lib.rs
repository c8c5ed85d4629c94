//! # Formwork Validate
//!
//! Declarative validation over a parsed [`ValueStore`].
//!
//! A [`Validator`] borrows one store and runs checks against it. Failed
//! checks are recorded as [`ValidationResult`]s rather than returned as
//! errors, so a handler can run every check it cares about and then show the
//! user all problems at once.
//!
//! ## Checks
//!
//! | Method | Fails when |
//! |--------|------------|
//! | [`require`](Validator::require) | value is absent or whitespace |
//! | [`require_file`](Validator::require_file) | no file, unreadable file, or empty file |
//! | [`min_length`](Validator::min_length) / [`max_length`](Validator::max_length) | trimmed length out of bounds |
//! | [`length_range`](Validator::length_range) | untrimmed length outside `[min, max]` |
//! | [`equal`](Validator::equal) | two fields differ |
//! | [`matches`](Validator::matches) / [`match_email`](Validator::match_email) | pattern does not match |
//! | [`type_int`](Validator::type_int) / [`type_float`](Validator::type_float) / [`type_bool`](Validator::type_bool) | value does not parse |
//! | [`greater`](Validator::greater) and friends | not a number, or comparison fails |
//! | [`accept_file_exts`](Validator::accept_file_exts) | uploaded file has a disallowed extension |
//!
//! ## Example
//!
//! ```rust
//! use formwork_extract::ValueStore;
//! use formwork_validate::ValidateExt;
//!
//! let store = ValueStore::from_pairs([
//!     ("password", "hunter2"),
//!     ("confirmPassword", "hunter3"),
//! ]);
//!
//! let mut v = store.validator();
//! v.require("password");
//! v.equal("password", "confirmPassword");
//! v.require("email").message("Please enter your email address.");
//!
//! let errors = v.error_map();
//! assert_eq!(errors["confirmPassword"], ["password and confirmPassword must match."]);
//! assert_eq!(errors["email"], ["Please enter your email address."]);
//! ```
//!
//! [`ValueStore`]: formwork_extract::ValueStore

#![doc(html_root_url = "https://docs.rs/formwork-validate/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod message;
pub mod pattern;
mod result;
mod validator;

pub use result::{Check, ValidationResult};
pub use validator::{ValidateExt, Validator};

// Re-export for custom `matches` patterns
pub use regex::Regex;
