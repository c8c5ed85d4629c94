//! JSON body flattening.
//!
//! A JSON object body is mapped onto the store one level deep: each top-level
//! member becomes one string value. Nested objects and arrays are kept as
//! their compact JSON text so they can be decoded later with
//! [`ValueStore::get_map_from_json`] and friends.

use serde_json::{Map, Number, Value};

use crate::{ExtractionSource, FormError, ValueStore};

/// Flattens a JSON object body into `store`.
///
/// | JSON value | stored as |
/// |---|---|
/// | string | the string itself |
/// | boolean | `true` / `false` |
/// | number | shortest decimal: `25.0` and `1e2` become `25` and `100` |
/// | null | the empty string |
/// | object, array | compact JSON text |
///
/// A zero-length body adds nothing.
///
/// # Example
///
/// ```rust
/// use formwork_extract::{flatten_json, ValueStore};
///
/// let mut store = ValueStore::new();
/// flatten_json(br#"{"age": 25, "tags": ["a", "b"], "nick": null}"#, &mut store).unwrap();
///
/// assert_eq!(store.get("age"), "25");
/// assert_eq!(store.get("tags"), r#"["a","b"]"#);
/// assert!(store.key_exists("nick"));
/// ```
///
/// # Errors
///
/// Returns a decode error if the body is not valid JSON or its top level is
/// not an object.
pub fn flatten_json(body: &[u8], store: &mut ValueStore) -> Result<(), FormError> {
    if body.is_empty() {
        return Ok(());
    }

    let members: Map<String, Value> = match serde_json::from_slice(body) {
        Ok(Value::Object(members)) => members,
        Ok(other) => {
            return Err(FormError::decode(
                ExtractionSource::Body,
                format!("expected a JSON object, found {}", kind_of(&other)),
            ))
        }
        Err(e) => return Err(FormError::decode(ExtractionSource::Body, e)),
    };

    for (key, value) in members {
        store.add(key, flatten_value(value));
    }
    Ok(())
}

fn flatten_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(&n),
        Value::Null => String::new(),
        nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
