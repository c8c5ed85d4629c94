//! Url-encoded form bodies.
//!
//! Bodies with a `application/x-www-form-urlencoded` content type are decoded
//! into ordered key/value pairs. Every occurrence of a key is kept.

use crate::{ExtractionSource, FormError};

/// Decodes a url-encoded body into key/value pairs in submission order.
///
/// `+` decodes to a space. A body that is not UTF-8 or that contains a
/// malformed percent escape is rejected. An empty body yields no pairs.
///
/// # Example
///
/// ```rust
/// use formwork_extract::decode_form;
///
/// let pairs = decode_form(b"name=Bob+Smith&tag=a&tag=b").unwrap();
/// assert_eq!(pairs[0], ("name".to_string(), "Bob Smith".to_string()));
/// assert_eq!(pairs.len(), 3);
///
/// assert!(decode_form(b"name=%zz").is_err());
/// ```
///
/// # Errors
///
/// Returns a decode error for non-UTF-8 bodies and malformed escapes.
pub fn decode_form(body: &[u8]) -> Result<Vec<(String, String)>, FormError> {
    let body_str = std::str::from_utf8(body).map_err(|e| {
        FormError::decode(ExtractionSource::Body, format!("invalid UTF-8: {e}"))
    })?;

    if let Some(offset) = find_bad_escape(body_str) {
        return Err(FormError::decode(
            ExtractionSource::Body,
            format!("invalid percent escape at byte {offset}"),
        ));
    }

    serde_urlencoded::from_str(body_str)
        .map_err(|e| FormError::decode(ExtractionSource::Body, e))
}

/// Byte offset of the first `%` not followed by two hex digits.
pub(crate) fn find_bad_escape(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'%')
        .map(|(i, _)| i)
        .find(|&i| {
            !matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_simple_form() {
        let decoded = decode_form(b"username=alice&password=secret123").unwrap();
        assert_eq!(decoded, pairs(&[("username", "alice"), ("password", "secret123")]));
    }

    #[test]
    fn test_url_encoded_values() {
        let decoded = decode_form(b"username=alice%40example.com&password=pass%3Dword").unwrap();
        assert_eq!(
            decoded,
            pairs(&[("username", "alice@example.com"), ("password", "pass=word")])
        );
    }

    #[test]
    fn test_plus_as_space() {
        let decoded = decode_form(b"greeting=hello+world").unwrap();
        assert_eq!(decoded, pairs(&[("greeting", "hello world")]));
    }

    #[test]
    fn test_repeated_keys_keep_order() {
        let decoded = decode_form(b"name=Bob&age=25&name=Bill").unwrap();
        assert_eq!(decoded, pairs(&[("name", "Bob"), ("age", "25"), ("name", "Bill")]));
    }

    #[test]
    fn test_empty_value_and_bare_key() {
        let decoded = decode_form(b"color=&flag").unwrap();
        assert_eq!(decoded, pairs(&[("color", ""), ("flag", "")]));
    }

    #[test]
    fn test_empty_body() {
        assert!(decode_form(b"").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_escape() {
        let err = decode_form(b"name=%zzBob").unwrap_err();
        assert_eq!(err.kind(), crate::FormErrorKind::Decode);
        assert_eq!(err.extraction_source(), ExtractionSource::Body);

        assert!(decode_form(b"name=Bob%").is_err());
        assert!(decode_form(b"name=Bob%4").is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let err = decode_form(&[b'a', b'=', 0xff, 0xfe]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_find_bad_escape() {
        assert_eq!(find_bad_escape("a=%41%42"), None);
        assert_eq!(find_bad_escape("a=%4G"), Some(2));
        assert_eq!(find_bad_escape("%"), Some(0));
    }
}
