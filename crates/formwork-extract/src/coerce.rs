//! Lexical rules for turning field strings into typed values.
//!
//! These are shared by the typed getters on [`ValueStore`](crate::ValueStore)
//! and by the type checks in the validator, so a field that passes validation
//! is guaranteed to coerce.

/// Parses a boolean literal.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parses a signed decimal integer.
#[must_use]
pub fn parse_int(value: &str) -> Option<i64> {
    value.parse().ok()
}

/// Parses a floating point number.
#[must_use]
pub fn parse_float(value: &str) -> Option<f64> {
    value.parse().ok()
}
