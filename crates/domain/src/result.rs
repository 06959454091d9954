//! Execution result entity.
//!
//! Every send ends in exactly one [`ExecutionOutcome`]: a completed
//! exchange (whatever the status code), a failure, or a user cancel.
//! Failures and cancels are data here, never errors.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::response::ResponseSpec;

/// What happened to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The server answered.
    Completed(Box<ResponseSpec>),

    /// The request could not be built or sent, or the response not read.
    Failed {
        /// Error category for display.
        kind: RequestErrorKind,
        /// Human-readable error message.
        message: String,
        /// Optional technical details.
        details: Option<String>,
    },

    /// The user canceled while the request was in flight.
    Canceled,
}

impl ExecutionOutcome {
    /// Creates a Failed outcome.
    #[must_use]
    pub fn failed(kind: RequestErrorKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a Failed outcome with details.
    #[must_use]
    pub fn failed_with_details(
        kind: RequestErrorKind,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Returns true if the server answered.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns true if the request failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns true if the user canceled.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Returns the response if the exchange completed.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseSpec> {
        match self {
            Self::Completed(response) => Some(response),
            _ => None,
        }
    }
}

/// One variable key substituted in one request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Field that was changed, e.g. `url` or `headers[0].value`.
    pub field: String,
    /// The `<<name>>` token that was replaced.
    pub key: String,
    /// Number of occurrences replaced.
    pub count: usize,
}

/// Result entity for one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Id of the request entity that was sent.
    pub request_id: String,
    /// When the send started.
    pub started_at: DateTime<Utc>,
    /// Wall time until the outcome was known.
    pub elapsed: Duration,
    /// What happened.
    pub outcome: ExecutionOutcome,
    /// Variable substitutions applied before sending.
    pub replacements: Vec<Replacement>,
}

/// Categories of request errors for user-friendly display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// Invalid URL format.
    InvalidUrl,

    /// DNS resolution failed.
    DnsError,

    /// Could not establish connection.
    ConnectionFailed,

    /// Connection was refused by the server.
    ConnectionRefused,

    /// Request timed out.
    Timeout,

    /// TLS/SSL error.
    TlsError,

    /// Invalid request body (e.g., unreadable form).
    InvalidBody,

    /// A payload file could not be read.
    FileRead,

    /// Too many redirects.
    TooManyRedirects,

    /// Unknown or unexpected error.
    Unknown,
}

impl RequestErrorKind {
    /// Returns user-friendly suggestions for this error type.
    #[must_use]
    pub const fn suggestions(&self) -> &[&'static str] {
        match self {
            Self::InvalidUrl => &[
                "Check that the URL starts with http:// or https://",
                "Check that every <<variable>> in the URL is defined",
            ],
            Self::DnsError => &[
                "Check if the hostname is correct",
                "Verify your internet connection",
            ],
            Self::ConnectionFailed | Self::ConnectionRefused => &[
                "Check if the server is running",
                "Verify the port number is correct",
                "Check your firewall settings",
            ],
            Self::Timeout => &[
                "The server may be slow or overloaded",
                "Try increasing the timeout value",
            ],
            Self::TlsError => &[
                "The server's SSL certificate may be invalid",
                "Check if the certificate has expired",
            ],
            Self::InvalidBody => &["Check the payload for invalid content"],
            Self::FileRead => &[
                "Check that the payload file exists",
                "Check that the file is readable",
            ],
            Self::TooManyRedirects => &[
                "The server may have a redirect loop",
                "Try the final URL directly",
            ],
            Self::Unknown => &["Check the error details for more information"],
        }
    }

    /// Returns a human-readable title for this error type.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "Invalid URL",
            Self::DnsError => "DNS Resolution Failed",
            Self::ConnectionFailed => "Connection Failed",
            Self::ConnectionRefused => "Connection Refused",
            Self::Timeout => "Request Timeout",
            Self::TlsError => "SSL/TLS Error",
            Self::InvalidBody => "Invalid Request Body",
            Self::FileRead => "Payload File Unreadable",
            Self::TooManyRedirects => "Too Many Redirects",
            Self::Unknown => "Unknown Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_outcome() {
        let outcome = ExecutionOutcome::Completed(Box::new(ResponseSpec::new(
            201u16,
            Vec::new(),
            Vec::new(),
            Duration::from_millis(5),
        )));
        assert!(outcome.is_completed());
        assert_eq!(outcome.response().map(|r| r.status), Some(201));
    }

    #[test]
    fn test_canceled_is_not_failure() {
        let outcome = ExecutionOutcome::Canceled;
        assert!(outcome.is_canceled());
        assert!(!outcome.is_failed());
        assert!(outcome.response().is_none());
    }

    #[test]
    fn test_failed_with_details() {
        let outcome = ExecutionOutcome::failed_with_details(
            RequestErrorKind::ConnectionRefused,
            "Connection refused",
            "localhost:9",
        );
        if let ExecutionOutcome::Failed {
            kind,
            message,
            details,
        } = outcome
        {
            assert_eq!(kind, RequestErrorKind::ConnectionRefused);
            assert_eq!(message, "Connection refused");
            assert_eq!(details.as_deref(), Some("localhost:9"));
        }
    }

    #[test]
    fn test_error_kind_title() {
        assert_eq!(RequestErrorKind::Timeout.title(), "Request Timeout");
        assert!(!RequestErrorKind::FileRead.suggestions().is_empty());
    }
}
