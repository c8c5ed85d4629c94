//! The accumulating validator.

use indexmap::IndexMap;
use regex::Regex;

use formwork_extract::coerce::{parse_bool, parse_float, parse_int};
use formwork_extract::ValueStore;

use crate::message;
use crate::{pattern, Check, ValidationResult};

/// Runs checks against one [`ValueStore`] and collects the failures.
///
/// Each check method records a [`ValidationResult`] when it fails and returns
/// a [`Check`] that can rename the field or replace the message. Checks never
/// abort: every failure is kept, in call order, for the caller to present.
///
/// # Example
///
/// ```rust
/// use formwork_extract::ValueStore;
/// use formwork_validate::Validator;
///
/// let store = ValueStore::from_pairs([("name", "Bob"), ("age", "seventeen")]);
/// let mut v = Validator::new(&store);
///
/// v.require("name");
/// v.min_length("name", 4);
/// v.type_int("age");
/// v.require("retired").message("Must specify whether or not person is retired.");
///
/// assert!(v.has_errors());
/// assert_eq!(
///     v.messages(),
///     [
///         "name must be at least 4 characters long.",
///         "age must be an integer.",
///         "Must specify whether or not person is retired.",
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Validator<'s> {
    store: &'s ValueStore,
    results: Vec<ValidationResult>,
}

impl<'s> Validator<'s> {
    /// Creates a validator over `store` with no recorded failures.
    #[must_use]
    pub fn new(store: &'s ValueStore) -> Self {
        Self {
            store,
            results: Vec::new(),
        }
    }

    /// The store being validated.
    #[must_use]
    pub fn store(&self) -> &'s ValueStore {
        self.store
    }

    /// Records a failure with a caller-supplied message.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) -> Check<'_> {
        let result = ValidationResult::new(field, message);
        tracing::debug!(field = %result.field(), message = %result.message(), "validation failed");

        let index = self.results.len();
        self.results.push(result);
        Check::Failed(&mut self.results[index])
    }

    /// True if any check has failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.results.is_empty()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// All recorded failures, in call order.
    #[must_use]
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Failure messages, in call order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.results.iter().map(ValidationResult::message).collect()
    }

    /// Failing field names, parallel to [`messages`](Self::messages).
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.results.iter().map(ValidationResult::field).collect()
    }

    /// Messages grouped by field.
    ///
    /// Fields appear in the order they first failed; each field's messages
    /// keep call order.
    #[must_use]
    pub fn error_map(&self) -> IndexMap<&str, Vec<&str>> {
        let mut map: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for result in &self.results {
            map.entry(result.field()).or_default().push(result.message());
        }
        map
    }

    /// Fails if `field` is absent or only whitespace.
    pub fn require(&mut self, field: &str) -> Check<'_> {
        if self.store.get(field).trim().is_empty() {
            return self.add_error(field, message::required(field));
        }
        Check::Ok
    }

    /// Fails if no file was uploaded under `field`, if it cannot be read, or
    /// if it is empty.
    pub fn require_file(&mut self, field: &str) -> Check<'_> {
        match self.store.file_bytes(field) {
            Ok(None) => self.add_error(field, message::required(field)),
            Err(e) => {
                tracing::debug!(field, error = %e, "uploaded file unreadable");
                self.add_error(field, message::FILE_UNREADABLE)
            }
            Ok(Some(bytes)) if bytes.is_empty() => {
                self.add_error(field, message::empty_file(field))
            }
            Ok(Some(_)) => Check::Ok,
        }
    }

    /// Fails if `field`, trimmed, has fewer than `length` characters.
    pub fn min_length(&mut self, field: &str, length: usize) -> Check<'_> {
        if self.store.get(field).trim().chars().count() < length {
            return self.add_error(field, message::min_length(field, length));
        }
        Check::Ok
    }

    /// Fails if `field`, trimmed, has more than `length` characters.
    pub fn max_length(&mut self, field: &str, length: usize) -> Check<'_> {
        if self.store.get(field).trim().chars().count() > length {
            return self.add_error(field, message::max_length(field, length));
        }
        Check::Ok
    }

    /// Fails if `field` has fewer than `min` or more than `max` characters.
    ///
    /// Unlike the single-bound checks, surrounding whitespace counts.
    pub fn length_range(&mut self, field: &str, min: usize, max: usize) -> Check<'_> {
        let len = self.store.get(field).chars().count();
        if len < min || len > max {
            return self.add_error(field, message::length_range(field, min, max));
        }
        Check::Ok
    }

    /// Fails if `first` and `second` hold different values.
    ///
    /// The failure is reported against `second`, the confirming field.
    pub fn equal(&mut self, first: &str, second: &str) -> Check<'_> {
        if self.store.get(first) != self.store.get(second) {
            return self.add_error(second, message::must_match(first, second));
        }
        Check::Ok
    }

    /// Fails if `field` does not match `pattern`.
    pub fn matches(&mut self, field: &str, pattern: &Regex) -> Check<'_> {
        if !pattern.is_match(self.store.get(field)) {
            return self.add_error(field, message::bad_format(field));
        }
        Check::Ok
    }

    /// Fails if `field` is not shaped like an email address.
    pub fn match_email(&mut self, field: &str) -> Check<'_> {
        self.matches(field, pattern::email())
    }

    /// Fails if `field` is not an integer.
    pub fn type_int(&mut self, field: &str) -> Check<'_> {
        if parse_int(self.store.get(field)).is_none() {
            return self.add_error(field, message::wrong_type(field, "integer"));
        }
        Check::Ok
    }

    /// Fails if `field` is not a number.
    pub fn type_float(&mut self, field: &str) -> Check<'_> {
        if parse_float(self.store.get(field)).is_none() {
            return self.add_error(field, message::wrong_type(field, "number"));
        }
        Check::Ok
    }

    /// Fails if `field` is not a boolean literal.
    pub fn type_bool(&mut self, field: &str) -> Check<'_> {
        if parse_bool(self.store.get(field)).is_none() {
            return self.add_error(field, message::wrong_type(field, "true or false"));
        }
        Check::Ok
    }

    /// Fails if `field` is not a number greater than `bound`.
    pub fn greater(&mut self, field: &str, bound: f64) -> Check<'_> {
        self.compare(field, bound, "greater than", |given, bound| given > bound)
    }

    /// Fails if `field` is not a number greater than or equal to `bound`.
    pub fn greater_or_equal(&mut self, field: &str, bound: f64) -> Check<'_> {
        self.compare(field, bound, "greater than or equal to", |given, bound| {
            given >= bound
        })
    }

    /// Fails if `field` is not a number less than `bound`.
    pub fn less(&mut self, field: &str, bound: f64) -> Check<'_> {
        self.compare(field, bound, "less than", |given, bound| given < bound)
    }

    /// Fails if `field` is not a number less than or equal to `bound`.
    pub fn less_or_equal(&mut self, field: &str, bound: f64) -> Check<'_> {
        self.compare(field, bound, "less than or equal to", |given, bound| {
            given <= bound
        })
    }

    fn compare(
        &mut self,
        field: &str,
        bound: f64,
        relation: &str,
        holds: impl Fn(f64, f64) -> bool,
    ) -> Check<'_> {
        match parse_float(self.store.get(field)) {
            None => self.add_error(field, message::wrong_type(field, "number")),
            Some(given) if !holds(given, bound) => {
                self.add_error(field, message::comparison(field, relation, bound))
            }
            Some(_) => Check::Ok,
        }
    }

    /// Fails if a file uploaded under `field` has an extension outside
    /// `allowed`.
    ///
    /// Extensions are given without the leading dot and compared
    /// case-sensitively. A missing file passes; pair with
    /// [`require_file`](Self::require_file) to demand one.
    pub fn accept_file_exts(&mut self, field: &str, allowed: &[&str]) -> Check<'_> {
        let store = self.store;
        let Some(file) = store.file(field) else {
            return Check::Ok;
        };

        let ext = file.extension();
        if ext.is_some_and(|ext| allowed.contains(&ext)) {
            return Check::Ok;
        }
        self.add_error(field, message::file_ext(ext, allowed))
    }
}

/// Creates a [`Validator`] straight from a store.
///
/// ```rust
/// use formwork_extract::ValueStore;
/// use formwork_validate::ValidateExt;
///
/// let store = ValueStore::from_pairs([("email", "bob@example.com")]);
/// let mut v = store.validator();
/// v.match_email("email");
///
/// assert!(!v.has_errors());
/// ```
pub trait ValidateExt {
    /// Returns a validator bound to `self`.
    fn validator(&self) -> Validator<'_>;
}

impl ValidateExt for ValueStore {
    fn validator(&self) -> Validator<'_> {
        Validator::new(self)
    }
}
