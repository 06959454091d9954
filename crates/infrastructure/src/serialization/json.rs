//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Deserialize {
        /// 1-based line of the error.
        line: usize,
        /// 1-based column of the error.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl SerializationError {
    fn deserialize(error: &serde_json::Error) -> Self {
        Self::Deserialize {
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        }
    }
}

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Same as [`to_json_stable`], as bytes for direct file writing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    to_json_stable(value).map(String::into_bytes)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error with the failing position if the JSON is invalid or
/// doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(|e| SerializationError::deserialize(&e))
}

/// Deserializes JSON from bytes. A UTF-8 byte order mark is tolerated.
///
/// # Errors
///
/// Returns an error with the failing position if the JSON is invalid or
/// doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    serde_json::from_slice(bytes).map_err(|e| SerializationError::deserialize(&e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wirepad_domain::{Request, Section};

    #[test]
    fn test_output_shape() {
        let section = Section::new("API");
        let json = to_json_stable(&section).unwrap();
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\n  \"label\": \"API\""));
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let json = to_json_stable(&Request::get("r", "https://example.com")).unwrap();
        let id = json.find("\"id\"").unwrap();
        let url = json.find("\"url\"").unwrap();
        let payload = json.find("\"payload\"").unwrap();
        assert!(id < url && url < payload);
    }

    #[test]
    fn test_same_value_same_bytes() {
        let section = Section::new("API").with_request(Request::get("r", "https://x"));
        assert_eq!(
            to_json_stable_bytes(&section).unwrap(),
            to_json_stable_bytes(&section.clone()).unwrap()
        );
    }

    #[test]
    fn test_from_json_bytes_skips_bom() {
        let value: serde_json::Value =
            from_json_bytes(b"\xEF\xBB\xBF{\"name\": \"test\"}").unwrap();
        assert_eq!(value["name"], "test");
    }

    #[test]
    fn test_error_reports_position() {
        let error = from_json::<serde_json::Value>("{\n  \"a\": }").unwrap_err();
        assert!(matches!(
            error,
            SerializationError::Deserialize { line: 2, .. }
        ));
    }
}
