//! Ordered header policy with apply and audit.

use std::fmt;

use edge_core::Headers;
use indexmap::IndexMap;
use serde::Serialize;

use crate::headers::SECURITY_HEADERS;

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors from building a policy.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PolicyError {
    #[error("invalid header name: {0}")]
    InvalidName(String),

    #[error("invalid value for header '{0}'")]
    InvalidValue(String),
}

/// A set of headers that must be present on a response with exact values.
///
/// Names are stored lower-case; order is the order headers were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPolicy {
    headers: IndexMap<String, String>,
}

impl HeaderPolicy {
    /// The fixed security header table.
    pub fn baseline() -> Self {
        Self {
            headers: SECURITY_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Add or replace a required header.
    ///
    /// The name and value are validated as HTTP header tokens.
    pub fn with_header(mut self, name: &str, value: &str) -> PolicyResult<Self> {
        let header_name = http::HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| PolicyError::InvalidName(name.to_string()))?;
        http::HeaderValue::from_str(value)
            .map_err(|_| PolicyError::InvalidValue(name.to_string()))?;

        self.headers
            .insert(header_name.as_str().to_string(), value.to_string());
        Ok(self)
    }

    /// Number of headers in the policy.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Whether the policy is empty.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Required value for a header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set every policy header on `headers`, overwriting existing values.
    pub fn apply(&self, headers: &mut Headers) -> ApplyReport {
        let mut report = ApplyReport::default();

        for (name, value) in self.iter() {
            match headers.set(name, value) {
                None => report.inserted.push(name.to_string()),
                Some(previous) if previous == value => report.unchanged.push(name.to_string()),
                Some(_) => report.overwritten.push(name.to_string()),
            }
        }

        report
    }

    /// Compare `headers` against the policy without modifying them.
    pub fn audit(&self, headers: &Headers) -> Vec<HeaderFinding> {
        self.iter()
            .filter_map(|(name, expected)| match headers.get(name) {
                None => Some(HeaderFinding::Missing {
                    name: name.to_string(),
                    expected: expected.to_string(),
                }),
                Some(actual) if actual != expected => Some(HeaderFinding::Mismatch {
                    name: name.to_string(),
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                }),
                Some(_) => None,
            })
            .collect()
    }
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::baseline()
    }
}

/// What `HeaderPolicy::apply` did to each header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Headers that were absent.
    pub inserted: Vec<String>,
    /// Headers that had a different value.
    pub overwritten: Vec<String>,
    /// Headers that already had the required value.
    pub unchanged: Vec<String>,
}

impl ApplyReport {
    /// Whether any header value changed.
    pub fn changed(&self) -> bool {
        !self.inserted.is_empty() || !self.overwritten.is_empty()
    }
}

/// A policy violation found by `HeaderPolicy::audit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderFinding {
    /// Header is not present.
    Missing { name: String, expected: String },
    /// Header is present with a different value.
    Mismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

impl HeaderFinding {
    /// The header the finding is about.
    pub fn name(&self) -> &str {
        match self {
            Self::Missing { name, .. } | Self::Mismatch { name, .. } => name,
        }
    }
}

impl fmt::Display for HeaderFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { name, expected } => {
                write!(f, "{name}: missing (expected \"{expected}\")")
            }
            Self::Mismatch {
                name,
                expected,
                actual,
            } => write!(f, "{name}: \"{actual}\" (expected \"{expected}\")"),
        }
    }
}
