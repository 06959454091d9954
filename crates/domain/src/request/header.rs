//! HTTP Header types

use serde::{Deserialize, Serialize};

/// A single request header row.
///
/// Rows are kept in the order the user entered them; disabled rows stay in
/// the list so they can be switched back on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The header name (e.g., "Content-Type")
    pub label: String,
    /// The header value (e.g., "application/json")
    pub value: String,
    /// Whether this header is switched off
    #[serde(default)]
    pub disabled: bool,
}

impl Header {
    /// Creates a new enabled header.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }

    /// Creates a new disabled header.
    #[must_use]
    pub fn disabled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: true,
        }
    }

    /// Returns true if the header has the given name, ignoring ASCII case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.label.trim().eq_ignore_ascii_case(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_creation() {
        let header = Header::new("Content-Type", "application/json");
        assert_eq!(header.label, "Content-Type");
        assert_eq!(header.value, "application/json");
        assert!(!header.disabled);
    }

    #[test]
    fn test_disabled_header() {
        let header = Header::disabled("X-Debug", "true");
        assert!(header.disabled);
    }

    #[test]
    fn test_is_named_ignores_case_and_padding() {
        let header = Header::new(" content-type ", "text/plain");
        assert!(header.is_named("Content-Type"));
        assert!(!header.is_named("Accept"));
    }
}
