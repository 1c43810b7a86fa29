//! The quote record

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A single quote
///
/// `text` and `category` are always present. `id` and `timestamp` are only
/// set on records that originated from the remote source and are omitted
/// from JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body
    pub text: String,

    /// Free-form category label
    pub category: String,

    /// Remote identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Remote timestamp (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Quote {
    /// Create a local quote
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            id: None,
            timestamp: None,
        }
    }

    /// Tag with a remote identifier
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Tag with a remote timestamp
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Whether this record came from the remote source
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.id.is_some()
    }

    /// Case-insensitive match on both text and category
    #[must_use]
    pub fn same_as(&self, text: &str, category: &str) -> bool {
        self.text.to_lowercase() == text.to_lowercase()
            && self.category.to_lowercase() == category.to_lowercase()
    }

    /// Case-insensitive, whitespace-trimmed category match
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.trim().to_lowercase() == category.trim().to_lowercase()
    }
}

impl Display for Quote {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\u{201c}{}\u{201d} \u{2014} {}", self.text, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_quote_omits_remote_fields() {
        let quote = Quote::new("a", "b");
        let json = serde_json::to_string(&quote).unwrap();
        assert_eq!(json, r#"{"text":"a","category":"b"}"#);
        assert!(!quote.is_remote());
    }

    #[test]
    fn remote_fields_round_trip() {
        let quote = Quote::new("a", "b")
            .with_id("7")
            .with_timestamp("2026-01-01T00:00:00Z");
        let json = serde_json::to_string(&quote).unwrap();
        let back: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quote);
        assert!(back.is_remote());
    }

    #[test]
    fn same_as_ignores_case() {
        let quote = Quote::new("Code Is Poetry", "Tech");
        assert!(quote.same_as("code is poetry", "TECH"));
        assert!(!quote.same_as("code is poetry", "Life"));
    }

    #[test]
    fn in_category_trims_and_ignores_case() {
        let quote = Quote::new("x", " Humor ");
        assert!(quote.in_category("humor"));
        assert!(!quote.in_category("hum"));
    }

    #[test]
    fn display_uses_typographic_quotes() {
        let quote = Quote::new("Hi", "Greeting");
        assert_eq!(quote.to_string(), "\u{201c}Hi\u{201d} \u{2014} Greeting");
    }
}
