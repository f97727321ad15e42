//! Vocabulary terms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque vocabulary token selectable to build a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Term(String);

impl Term {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        needle.is_empty() || self.0.to_lowercase().contains(needle)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `GET /terms` response body.
///
/// `terms` that is missing or not a list decodes as empty; non-string entries
/// are skipped.
#[derive(Debug, Clone, Default)]
pub struct TermList {
    /// Vocabulary in backend order.
    pub terms: Vec<Term>,
}

impl TermList {
    /// Decode from an already-parsed body.
    #[must_use]
    pub fn from_value(body: &serde_json::Value) -> Self {
        let terms = body
            .get("terms")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items.iter().filter_map(serde_json::Value::as_str).map(Term::from).collect()
            })
            .unwrap_or_default();
        Self { terms }
    }
}
