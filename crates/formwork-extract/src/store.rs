//! The unified multi-value field store.
//!
//! A [`ValueStore`] is what parsing a request produces: every body field and
//! query parameter, in the order they were appended, plus any uploaded files.
//! Because values come from several sources a key may hold more than one
//! value; the single-value accessors always read the first one, which is why
//! body values (appended first) take precedence over query values.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::coerce::{parse_bool, parse_float, parse_int};
use crate::{FormError, UploadedFile};

/// Ordered multi-value map of request fields with a side map of files.
///
/// # Example
///
/// ```rust
/// use formwork_extract::ValueStore;
///
/// let mut store = ValueStore::new();
/// store.add("name", "Bob");
/// store.add("name", "Bill");
/// store.add("color", "");
///
/// assert_eq!(store.get("name"), "Bob");
/// assert_eq!(store.values("name").unwrap(), ["Bob", "Bill"]);
/// assert!(store.key_exists("color"));
/// assert!(!store.key_exists("size"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    values: IndexMap<String, Vec<String>>,
    files: IndexMap<String, UploadedFile>,
    json_body: Option<Bytes>,
}

impl ValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store holding one value per pair, in iteration order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Appends `value` to the values for `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces every value for `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), vec![value.into()]);
    }

    /// Removes `key` and all of its values.
    pub fn del(&mut self, key: &str) {
        self.values.shift_remove(key);
    }

    /// Associates a file with `key`, replacing any previous file.
    pub fn add_file(&mut self, key: impl Into<String>, file: UploadedFile) {
        self.files.insert(key.into(), file);
    }

    /// Removes the file associated with `key`, if any.
    pub fn del_file(&mut self, key: &str) {
        self.files.shift_remove(key);
    }

    /// First value for `key`, or the empty string.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.values
            .get(key)
            .and_then(|vals| vals.first())
            .map_or("", String::as_str)
    }

    /// All values for `key`, in insertion order.
    #[must_use]
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// True if `key` was submitted, even with an empty value.
    #[must_use]
    pub fn key_exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// True if a file was submitted under `key`.
    #[must_use]
    pub fn file_exists(&self, key: &str) -> bool {
        self.files.contains_key(key)
    }

    /// The file submitted under `key`.
    #[must_use]
    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.get(key)
    }

    /// Content of the file submitted under `key`.
    ///
    /// Returns `Ok(None)` when there is no such file. Use
    /// [`file_exists`](Self::file_exists) to tell an absent file from an
    /// empty one.
    pub fn file_bytes(&self, key: &str) -> Result<Option<Bytes>, FormError> {
        self.files.get(key).map(UploadedFile::bytes).transpose()
    }

    /// Field names in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over every key and its values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Iterates over every uploaded file and the key it was submitted under.
    pub fn files(&self) -> impl Iterator<Item = (&str, &UploadedFile)> {
        self.files.iter().map(|(k, f)| (k.as_str(), f))
    }

    /// Number of distinct value keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the store holds no values and no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.files.is_empty()
    }

    /// Encodes the values as `a=1&b=2`, sorted by key.
    ///
    /// Keys and values are form-encoded, so a space becomes `+`. Files are
    /// skipped.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();

        let pairs: Vec<(&str, &str)> = keys
            .into_iter()
            .flat_map(|key| {
                self.values[key]
                    .iter()
                    .map(move |value| (key.as_str(), value.as_str()))
            })
            .collect();
        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }

    /// First value for `key` as bytes.
    #[must_use]
    pub fn get_bytes(&self, key: &str) -> &[u8] {
        self.get(key).as_bytes()
    }

    fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|vals| vals.first())
            .map(String::as_str)
    }

    /// First value for `key` as an integer.
    ///
    /// Returns `Ok(0)` when the key is absent. A present value that is not an
    /// integer is a coercion error: validate with `type_int` first.
    pub fn get_int(&self, key: &str) -> Result<i64, FormError> {
        match self.first(key) {
            None => Ok(0),
            Some(raw) => parse_int(raw).ok_or_else(|| FormError::coercion(key, "integer", raw)),
        }
    }

    /// First value for `key` as a float.
    ///
    /// Returns `Ok(0.0)` when the key is absent and a coercion error when the
    /// present value is not a number.
    pub fn get_float(&self, key: &str) -> Result<f64, FormError> {
        match self.first(key) {
            None => Ok(0.0),
            Some(raw) => parse_float(raw).ok_or_else(|| FormError::coercion(key, "number", raw)),
        }
    }

    /// First value for `key` as a boolean.
    ///
    /// Returns `Ok(false)` when the key is absent and a coercion error when
    /// the present value is not a boolean literal.
    pub fn get_bool(&self, key: &str) -> Result<bool, FormError> {
        match self.first(key) {
            None => Ok(false),
            Some(raw) => parse_bool(raw).ok_or_else(|| FormError::coercion(key, "boolean", raw)),
        }
    }

    /// Splits the first value for `key` on `delim`.
    ///
    /// Returns `None` when the key is absent, so "no field" stays
    /// distinguishable from "empty field". An empty delimiter splits the
    /// value into its characters.
    #[must_use]
    pub fn get_strings_split<'a>(&'a self, key: &str, delim: &str) -> Option<Vec<&'a str>> {
        let value = self.first(key)?;
        if delim.is_empty() {
            return Some(
                value
                    .char_indices()
                    .map(|(i, c)| &value[i..i + c.len_utf8()])
                    .collect(),
            );
        }
        Some(value.split(delim).collect())
    }

    /// Decodes the first value for `key` as a JSON object.
    pub fn get_map_from_json(&self, key: &str) -> Result<Option<Map<String, Value>>, FormError> {
        self.get_and_unmarshal_json(key)
    }

    /// Decodes the first value for `key` as a JSON array.
    pub fn get_slice_from_json(&self, key: &str) -> Result<Option<Vec<Value>>, FormError> {
        self.get_and_unmarshal_json(key)
    }

    /// Decodes the first value for `key` as JSON into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn get_and_unmarshal_json<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, FormError> {
        let Some(raw) = self.first(key) else {
            return Ok(None);
        };
        serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| FormError::field_decode(key, e))
    }

    /// Deserializes the original JSON request body into `T`.
    ///
    /// Returns `Ok(None)` when the request did not carry a JSON body.
    pub fn bind_json<T: DeserializeOwned>(&self) -> Result<Option<T>, FormError> {
        match &self.json_body {
            Some(body) if !body.is_empty() => serde_json::from_slice(body)
                .map(Some)
                .map_err(|e| FormError::decode(crate::ExtractionSource::Body, e)),
            _ => Ok(None),
        }
    }

    /// The raw JSON body, if the request carried one.
    #[must_use]
    pub fn json_body(&self) -> Option<&Bytes> {
        self.json_body.as_ref()
    }

    pub(crate) fn set_json_body(&mut self, body: Bytes) {
        self.json_body = Some(body);
    }
}

impl<K, V> FromIterator<(K, V)> for ValueStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            store.add(key, value);
        }
        store
    }
}
