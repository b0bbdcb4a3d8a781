//! Ordered, case-insensitive, byte-safe header multimap.
//!
//! Keys are canonicalized (`content-TYPE` is stored and matched as
//! `Content-Type`) while insertion order is preserved. Values are raw
//! bytes; text input is encoded with the owning request's declared
//! encoding, so the map stays binary-safe regardless of input form.
//!
//! # Example
//!
//! ```
//! use crawlwire::headers::Headers;
//!
//! let mut headers = Headers::new(encoding_rs::UTF_8);
//! headers.append("accept", "text/html");
//! headers.append("ACCEPT", "application/json");
//!
//! assert_eq!(headers.get("Accept"), Some(&bytes::Bytes::from_static(b"text/html")));
//! assert_eq!(headers.get_all("accept").len(), 2);
//! ```

use bytes::Bytes;
use encoding_rs::Encoding;
use indexmap::IndexMap;

use crate::encoding;

/// A header value before normalization: text or raw bytes.
#[derive(Debug, Clone)]
pub enum HeaderValue {
    /// Text, encoded with the request's declared encoding on insert.
    Text(String),
    /// Raw bytes, stored as-is.
    Bytes(Bytes),
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<&String> for HeaderValue {
    fn from(value: &String) -> Self {
        HeaderValue::Text(value.clone())
    }
}

impl From<Bytes> for HeaderValue {
    fn from(value: Bytes) -> Self {
        HeaderValue::Bytes(value)
    }
}

impl From<Vec<u8>> for HeaderValue {
    fn from(value: Vec<u8>) -> Self {
        HeaderValue::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for HeaderValue {
    fn from(value: &[u8]) -> Self {
        HeaderValue::Bytes(Bytes::copy_from_slice(value))
    }
}

/// Ordered multimap of header name to values with case-insensitive keys.
#[derive(Debug, Clone)]
pub struct Headers {
    inner: IndexMap<String, Vec<Bytes>>,
    encoding: &'static Encoding,
}

impl Headers {
    /// Create an empty header map bound to the given value encoding.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            inner: IndexMap::new(),
            encoding,
        }
    }

    /// Build a header map from name/value pairs.
    ///
    /// Both a mapping and an iterable of pairs normalize through this path;
    /// repeated names accumulate as multi-values.
    pub fn from_pairs<I, K, V>(pairs: I, encoding: &'static Encoding) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<HeaderValue>,
    {
        let mut headers = Self::new(encoding);
        for (name, value) in pairs {
            headers.append(name.as_ref(), value);
        }
        headers
    }

    /// Append a value under a name, keeping any existing values.
    pub fn append(&mut self, name: &str, value: impl Into<HeaderValue>) {
        let value = self.normalize(value.into());
        self.inner.entry(canonical_name(name)).or_default().push(value);
    }

    /// Replace all values under a name with a single value.
    pub fn set(&mut self, name: &str, value: impl Into<HeaderValue>) {
        let value = self.normalize(value.into());
        self.inner.insert(canonical_name(name), vec![value]);
    }

    /// Get the first value for a name, if any.
    pub fn get(&self, name: &str) -> Option<&Bytes> {
        self.inner.get(&canonical_name(name)).and_then(|v| v.first())
    }

    /// Get all values for a name; empty when absent.
    pub fn get_all(&self, name: &str) -> &[Bytes] {
        self.inner
            .get(&canonical_name(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether a name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&canonical_name(name))
    }

    /// Remove a name and return its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<Bytes>> {
        self.inner.shift_remove(&canonical_name(name))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the map has no headers.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over names and their value lists in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Bytes])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The value encoding this map was built with.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Plain ordered mapping of decoded string values, for serialization.
    pub fn to_string_map(&self) -> IndexMap<String, Vec<String>> {
        self.inner
            .iter()
            .map(|(name, values)| {
                let decoded = values
                    .iter()
                    .map(|v| encoding::decode(v, self.encoding))
                    .collect();
                (name.clone(), decoded)
            })
            .collect()
    }

    fn normalize(&self, value: HeaderValue) -> Bytes {
        match value {
            HeaderValue::Text(text) => encoding::encode(&text, self.encoding),
            HeaderValue::Bytes(bytes) => bytes,
        }
    }
}

impl PartialEq for Headers {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Headers {}

/// Canonical header-name casing: each hyphen-separated segment starts
/// uppercase, the rest is lowercase.
fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c == '-' {
            out.push('-');
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1252};

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("content-type"), "Content-Type");
        assert_eq!(canonical_name("ACCEPT-LANGUAGE"), "Accept-Language");
        assert_eq!(canonical_name("x-b3-traceid"), "X-B3-Traceid");
        assert_eq!(canonical_name("etag"), "Etag");
    }

    #[test]
    fn test_case_insensitive_access() {
        let mut headers = Headers::new(UTF_8);
        headers.set("Content-Type", "text/html");

        assert_eq!(
            headers.get("content-type"),
            Some(&Bytes::from_static(b"text/html"))
        );
        assert!(headers.contains("CONTENT-TYPE"));
    }

    #[test]
    fn test_multi_values_preserved_in_order() {
        let mut headers = Headers::new(UTF_8);
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");

        let all = headers.get_all("Set-Cookie");
        assert_eq!(all, &[Bytes::from_static(b"a=1"), Bytes::from_static(b"b=2")]);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_set_replaces_values() {
        let mut headers = Headers::new(UTF_8);
        headers.append("Accept", "text/html");
        headers.append("Accept", "text/plain");
        headers.set("Accept", "application/json");

        assert_eq!(headers.get_all("Accept").len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let headers = Headers::from_pairs(
            [("b-second", "2"), ("a-first", "1"), ("c-third", "3")],
            UTF_8,
        );
        let names: Vec<_> = headers.iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, ["B-Second", "A-First", "C-Third"]);
    }

    #[test]
    fn test_text_values_use_declared_encoding() {
        let mut headers = Headers::new(WINDOWS_1252);
        headers.set("X-Name", "café");
        assert_eq!(headers.get("X-Name"), Some(&Bytes::from_static(b"caf\xe9")));
    }

    #[test]
    fn test_binary_values_pass_through() {
        let mut headers = Headers::new(UTF_8);
        headers.set("X-Raw", Bytes::from_static(b"\x00\xff\x01"));
        assert_eq!(headers.get("X-Raw"), Some(&Bytes::from_static(b"\x00\xff\x01")));
    }

    #[test]
    fn test_to_string_map() {
        let mut headers = Headers::new(UTF_8);
        headers.append("Accept", "text/html");
        headers.append("Accept", "text/plain");
        headers.set("Host", "example.com");

        let map = headers.to_string_map();
        assert_eq!(map["Accept"], vec!["text/html", "text/plain"]);
        assert_eq!(map["Host"], vec!["example.com"]);
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::new(UTF_8);
        headers.set("X-Gone", "soon");
        assert_eq!(headers.remove("x-gone").unwrap().len(), 1);
        assert!(!headers.contains("X-Gone"));
        assert!(headers.is_empty());
    }
}
