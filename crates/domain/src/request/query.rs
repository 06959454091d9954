//! Query parameter types

use serde::{Deserialize, Serialize};

/// A query parameter key-value pair.
///
/// Supports enable/disable without deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub label: String,
    /// The parameter value
    pub value: String,
    /// Whether this parameter is switched off
    #[serde(default)]
    pub disabled: bool,
}

impl QueryParam {
    /// Creates a new enabled query parameter.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }

    /// Creates a disabled query parameter.
    #[must_use]
    pub fn disabled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_creation() {
        let param = QueryParam::new("page", "1");
        assert_eq!(param.label, "page");
        assert_eq!(param.value, "1");
        assert!(!param.disabled);
    }

    #[test]
    fn test_disabled_param() {
        let param = QueryParam::disabled("debug", "true");
        assert!(param.disabled);
    }
}
