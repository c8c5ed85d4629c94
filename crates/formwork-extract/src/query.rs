//! Query string decoding.
//!
//! Query parameters are appended to the store after the body, so they only
//! win over body fields for keys the body did not carry.

use crate::form::find_bad_escape;

/// Decodes a raw query string into key/value pairs in order of appearance.
///
/// Unlike [`decode_form`](crate::decode_form) this never fails. A pair with a
/// malformed percent escape is dropped and the rest of the query is kept.
/// Invalid UTF-8 is replaced.
///
/// # Example
///
/// ```rust
/// use formwork_extract::decode_query;
///
/// let pairs = decode_query("page=2&sort=name+asc");
/// assert_eq!(pairs[1], ("sort".to_string(), "name asc".to_string()));
///
/// let pairs = decode_query("name=%zz&page=2");
/// assert_eq!(pairs, [("page".to_string(), "2".to_string())]);
/// ```
#[must_use]
pub fn decode_query(query: &str) -> Vec<(String, String)> {
    let kept: Vec<&str> = query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| match find_bad_escape(segment) {
            Some(offset) => {
                tracing::debug!(offset, "dropping query pair with invalid percent escape");
                false
            }
            None => true,
        })
        .collect();

    match serde_urlencoded::from_str(&kept.join("&")) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring undecodable query string");
            Vec::new()
        }
    }
}
