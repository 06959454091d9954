//! Request entity

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Header, HttpMethod, Payload, QueryParam, SecurityEntity};
use crate::id::generate_id;

/// A saved HTTP request definition, the leaf of the project tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Unique identifier for this request
    pub id: String,
    /// Human-readable name shown in the tree
    pub label: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL (may contain `<<variable>>` placeholders)
    pub url: String,
    /// Query parameters appended to the URL
    #[serde(default)]
    pub query: Vec<QueryParam>,
    /// HTTP headers
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Authorization
    #[serde(default)]
    pub security: SecurityEntity,
    /// Request body
    #[serde(default)]
    pub payload: Payload,
}

impl Request {
    /// Creates a new GET request with no URL.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            label: label.into(),
            notes: String::new(),
            method: HttpMethod::default(),
            url: String::new(),
            query: Vec::new(),
            headers: Vec::new(),
            security: SecurityEntity::default(),
            payload: Payload::default(),
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(label).with_url(url)
    }

    /// Sets the method.
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push(QueryParam::new(label, value));
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(label, value));
        self
    }

    /// Sets the security entity.
    #[must_use]
    pub fn with_security(mut self, security: SecurityEntity) -> Self {
        self.security = security;
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Returns a copy with a fresh id and a `(copy)` label suffix.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: generate_id(),
            label: format!("{} (copy)", self.label),
            ..self.clone()
        }
    }

    /// Validates the URL and returns parsed version if valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn parse_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.url.trim())
    }

    /// Returns true if the URL contains variable placeholders.
    #[must_use]
    pub fn has_variables(&self) -> bool {
        self.url.contains("<<") && self.url.contains(">>")
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new("New Request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_request() {
        let req = Request::new("Test Request");
        assert_eq!(req.label, "Test Request");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.security.is_inherit());
    }

    #[test]
    fn test_get_request() {
        let req = Request::get("Users", "https://api.example.com/users");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.example.com/users");
    }

    #[test]
    fn test_has_variables() {
        let mut req = Request::new("Test");
        req.url = "https://<<host>>/api/<<version>>/users".to_string();
        assert!(req.has_variables());

        req.url = "https://api.example.com/users".to_string();
        assert!(!req.has_variables());
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let req =
            Request::get("Users", "https://api.example.com/users").with_header("Accept", "*/*");
        let copy = req.duplicate();
        assert_ne!(copy.id, req.id);
        assert_eq!(copy.label, "Users (copy)");
        assert_eq!(copy.headers, req.headers);
    }
}
