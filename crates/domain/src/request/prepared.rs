//! Fully resolved request, ready for the wire.

use super::HttpMethod;

/// A request after variable substitution, security resolution and
/// validation. Only enabled rows with non-blank labels survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Id of the request entity this was prepared from.
    pub request_id: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Target URL without the query parameters below.
    pub url: String,
    /// Query pairs to append to the URL, in order.
    pub query: Vec<(String, String)>,
    /// Header pairs, in order.
    pub headers: Vec<(String, String)>,
    /// Body to send.
    pub body: PreparedBody,
}

impl PreparedRequest {
    /// Returns the first header value with the given name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Resolved body of a [`PreparedRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreparedBody {
    /// No body.
    #[default]
    None,
    /// Raw text.
    Text(String),
    /// Contents of a file on disk.
    File(String),
    /// `application/x-www-form-urlencoded` pairs.
    UrlEncoded(Vec<(String, String)>),
    /// `multipart/form-data` parts.
    Multipart(Vec<MultipartPart>),
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    /// Text part.
    Text {
        /// Part name.
        name: String,
        /// Part value.
        value: String,
    },
    /// File part read from disk.
    File {
        /// Part name.
        name: String,
        /// Path of the file.
        path: String,
    },
}
