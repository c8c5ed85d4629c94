//! Validation outcomes.

use std::fmt;

/// One failed check: the field it is reported against and a message for the
/// end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    field: String,
    message: String,
}

impl ValidationResult {
    /// Creates a result for `field` with `message`.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field this failure is reported against.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The message shown to the end user.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Handle returned by every check on a [`Validator`](crate::Validator).
///
/// A passing check returns [`Check::Ok`], which carries nothing, so
/// overriding its field or message does nothing. A failing check returns
/// [`Check::Failed`], which points at the result just recorded; overrides
/// rewrite that entry in place.
///
/// # Example
///
/// ```rust
/// use formwork_extract::ValueStore;
/// use formwork_validate::Validator;
///
/// let store = ValueStore::from_pairs([("name", "Bob")]);
/// let mut v = Validator::new(&store);
///
/// v.require("name").message("ignored: this check passes");
/// v.require("age").field("years").message("Tell us how old you are.");
///
/// assert_eq!(v.fields(), ["years"]);
/// assert_eq!(v.messages(), ["Tell us how old you are."]);
/// ```
#[derive(Debug)]
pub enum Check<'v> {
    /// The check passed and nothing was recorded.
    Ok,
    /// The check failed; the recorded result can still be adjusted.
    Failed(&'v mut ValidationResult),
}

impl Check<'_> {
    /// Reports the failure against a different field name.
    pub fn field(self, field: impl Into<String>) -> Self {
        match self {
            Self::Ok => Self::Ok,
            Self::Failed(result) => {
                result.field = field.into();
                Self::Failed(result)
            }
        }
    }

    /// Replaces the default failure message.
    pub fn message(self, message: impl Into<String>) -> Self {
        match self {
            Self::Ok => Self::Ok,
            Self::Failed(result) => {
                result.message = message.into();
                Self::Failed(result)
            }
        }
    }

    /// True if the check passed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The recorded failure, if the check failed.
    #[must_use]
    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            Self::Ok => None,
            Self::Failed(result) => Some(result),
        }
    }
}
