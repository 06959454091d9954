//! Request payload types

use serde::{Deserialize, Serialize};

/// The body sent with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    /// No body
    #[default]
    None,
    /// Raw text body (JSON, XML, plain text, ...)
    Text {
        /// The body content
        content: String,
        /// The content type (e.g., "application/json")
        content_type: String,
    },
    /// Body streamed from a file on disk
    File {
        /// Path of the file to send
        path: String,
        /// Explicit content type; guessed from the extension when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
    /// Form body
    Form {
        /// Wire encoding of the form
        encoding: FormEncoding,
        /// Form rows in entry order
        fields: Vec<FormField>,
    },
}

impl Payload {
    /// Creates a JSON text body.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            content_type: "application/json".to_string(),
        }
    }

    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            content_type: "text/plain".to_string(),
        }
    }

    /// Creates a file body with a guessed content type.
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self::File {
            path: path.into(),
            content_type: None,
        }
    }

    /// Creates a url-encoded form body.
    #[must_use]
    pub const fn url_encoded(fields: Vec<FormField>) -> Self {
        Self::Form {
            encoding: FormEncoding::UrlEncoded,
            fields,
        }
    }

    /// Creates a multipart form body.
    #[must_use]
    pub const fn multipart(fields: Vec<FormField>) -> Self {
        Self::Form {
            encoding: FormEncoding::Multipart,
            fields,
        }
    }

    /// Returns true when nothing will be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text { content, .. } => content.is_empty(),
            Self::File { path, .. } => path.trim().is_empty(),
            Self::Form { fields, .. } => fields.iter().all(|f| f.disabled),
        }
    }
}

/// Wire encoding of a form payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormEncoding {
    /// `application/x-www-form-urlencoded`
    #[default]
    UrlEncoded,
    /// `multipart/form-data`
    Multipart,
}

/// A single form row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Field name
    pub label: String,
    /// Field value, or the file path when `is_file` is set
    pub value: String,
    /// Whether this row is switched off
    #[serde(default)]
    pub disabled: bool,
    /// Whether `value` names a file to upload (multipart only)
    #[serde(default)]
    pub is_file: bool,
}

impl FormField {
    /// Creates a text field.
    #[must_use]
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
            is_file: false,
        }
    }

    /// Creates a file field.
    #[must_use]
    pub fn file(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: path.into(),
            disabled: false,
            is_file: true,
        }
    }

    /// Marks the field disabled.
    #[must_use]
    pub const fn into_disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_payload() {
        let payload = Payload::json(r#"{"key": "value"}"#);
        assert!(!payload.is_empty());
        assert!(matches!(
            payload,
            Payload::Text { ref content_type, .. } if content_type == "application/json"
        ));
    }

    #[test]
    fn test_empty_payloads() {
        assert!(Payload::None.is_empty());
        assert!(Payload::text("").is_empty());
        assert!(Payload::file("  ").is_empty());
        assert!(Payload::url_encoded(vec![FormField::text("a", "b").into_disabled()]).is_empty());
    }
}
