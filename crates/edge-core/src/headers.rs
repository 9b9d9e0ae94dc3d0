//! Response header mapping as exchanged with the edge platform.
//!
//! Headers arrive as a JSON object keyed by lower-case header name, each
//! entry a record `{ "value": "..." }`:
//!
//! ```json
//! { "content-type": { "value": "video/mp4" } }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single header record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// Header value.
    pub value: String,
    /// Any other fields the platform attached to the record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HeaderEntry {
    /// Create a record holding only a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            extra: Map::new(),
        }
    }
}

/// Ordered header mapping with case-insensitive names.
///
/// Insertion order is kept so a response round-trips with its headers in the
/// order the platform sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(IndexMap<String, HeaderEntry>);

impl Headers {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a header value by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entry(name).map(|entry| entry.value.as_str())
    }

    /// Get the full header record by name (case-insensitive).
    pub fn entry(&self, name: &str) -> Option<&HeaderEntry> {
        if let Some(entry) = self.0.get(name) {
            return Some(entry);
        }
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, entry)| entry)
    }

    /// Set a header, replacing every entry whose name matches case-insensitively.
    ///
    /// The name is stored lower-cased. A replaced header keeps the position of
    /// its first occurrence; a new header is appended. Returns the previous
    /// value, if any.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        let name = name.to_ascii_lowercase();
        let (position, previous) = self.remove_all(&name);

        let entry = HeaderEntry::new(value);
        match position {
            Some(index) => {
                self.0.shift_insert(index, name, entry);
            }
            None => {
                self.0.insert(name, entry);
            }
        }

        previous.map(|entry| entry.value)
    }

    /// Iterate over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.value.as_str()))
    }

    /// Render as the platform's JSON object shape.
    pub fn to_json(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(name, entry)| {
                let mut record = Map::new();
                record.insert("value".to_string(), Value::String(entry.value.clone()));
                for (key, value) in &entry.extra {
                    record.insert(key.clone(), value.clone());
                }
                (name.clone(), Value::Object(record))
            })
            .collect()
    }

    /// Header names in order.
    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    fn remove_all(&mut self, name: &str) -> (Option<usize>, Option<HeaderEntry>) {
        let mut position = None;
        let mut first = None;

        loop {
            let Some(index) = self.0.keys().position(|k| k.eq_ignore_ascii_case(name)) else {
                break;
            };
            if let Some((_, entry)) = self.0.shift_remove_index(index) {
                position.get_or_insert(index);
                first.get_or_insert(entry);
            }
        }

        (position, first)
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name.as_ref(), value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn from_json(value: Value) -> Headers {
        serde_json::from_value(value).unwrap()
    }

    // === Lookup Tests ===

    #[test]
    fn test_get_case_insensitive() {
        let headers = from_json(json!({ "Content-Type": { "value": "video/mp4" } }));
        assert_eq!(headers.get("content-type"), Some("video/mp4"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("video/mp4"));
        assert!(headers.entry("Content-Type").is_some());
        assert!(headers.entry("etag").is_none());
    }

    // === Set Tests ===

    #[test]
    fn test_set_appends_new_header() {
        let mut headers = Headers::from_iter([("content-type", "text/html")]);
        let previous = headers.set("X-Frame-Options", "DENY");

        assert_eq!(previous, None);
        assert_eq!(headers.names(), vec!["content-type", "x-frame-options"]);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut headers = Headers::from_iter([
            ("content-type", "video/mp4"),
            ("x-frame-options", "SAMEORIGIN"),
            ("etag", "\"abc\""),
        ]);

        let previous = headers.set("x-frame-options", "DENY");

        assert_eq!(previous.as_deref(), Some("SAMEORIGIN"));
        assert_eq!(headers.get("x-frame-options"), Some("DENY"));
        assert_eq!(headers.names(), vec!["content-type", "x-frame-options", "etag"]);
    }

    #[test]
    fn test_set_collapses_case_variants() {
        let mut headers = from_json(json!({
            "X-Frame-Options": { "value": "SAMEORIGIN" },
            "content-type": { "value": "text/css" },
            "x-frame-options": { "value": "ALLOW-FROM https://example.com" },
        }));

        headers.set("x-frame-options", "DENY");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.names(), vec!["x-frame-options", "content-type"]);
        assert_eq!(headers.get("X-FRAME-OPTIONS"), Some("DENY"));
    }

    #[test]
    fn test_set_drops_extra_fields_of_replaced_entry() {
        let mut headers = from_json(json!({
            "x-frame-options": { "value": "SAMEORIGIN", "multiValue": [] },
        }));

        headers.set("x-frame-options", "DENY");

        assert_eq!(
            headers.entry("x-frame-options"),
            Some(&HeaderEntry::new("DENY"))
        );
    }

    #[test]
    fn test_set_leaves_other_case_spellings_alone() {
        let mut headers = from_json(json!({
            "Content-Type": { "value": "video/mp4" },
            "ETag": { "value": "\"d41d8cd9\"" },
        }));

        headers.set("x-frame-options", "DENY");

        assert_eq!(headers.names(), vec!["Content-Type", "ETag", "x-frame-options"]);
    }

    // === Serde Tests ===

    #[test]
    fn test_to_json_matches_serialization() {
        let headers = from_json(json!({
            "age": { "value": "42" },
            "content-type": { "value": "video/mp4", "multiValue": [{ "value": "video/mp4" }] },
        }));

        assert_eq!(
            Value::Object(headers.to_json()).to_string(),
            serde_json::to_string(&headers).unwrap()
        );
    }

    #[test]
    fn test_serialization_keeps_order_and_extras() {
        let input = json!({
            "server": { "value": "CloudFront" },
            "content-type": { "value": "video/mp4", "multiValue": [{ "value": "video/mp4" }] },
            "age": { "value": "42" },
        });
        let headers = from_json(input.clone());

        assert_eq!(headers.names(), vec!["server", "content-type", "age"]);
        assert_eq!(serde_json::to_value(&headers).unwrap(), input);
    }
}
