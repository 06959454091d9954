//! HTTP Client port

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use wirepad_domain::{PreparedRequest, RequestErrorKind, ResponseSpec};

/// Errors an HTTP client adapter can report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// DNS resolution failed.
    #[error("Could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying message.
        message: String,
    },

    /// The server refused the connection.
    #[error("Connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed for another reason.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request did not finish in time.
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// TLS handshake or certificate failure.
    #[error("TLS error: {0}")]
    TlsError(String),

    /// The redirect limit was exceeded.
    #[error("Too many redirects (max {max})")]
    TooManyRedirects {
        /// Configured limit.
        max: usize,
    },

    /// The body could not be built.
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    /// A payload file could not be read.
    #[error("Could not read '{path}': {message}")]
    FileRead {
        /// Path of the file.
        path: String,
        /// Underlying message.
        message: String,
    },

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Maps the error to its display category.
    #[must_use]
    pub const fn to_error_kind(&self) -> RequestErrorKind {
        match self {
            Self::InvalidUrl(_) => RequestErrorKind::InvalidUrl,
            Self::DnsError { .. } => RequestErrorKind::DnsError,
            Self::ConnectionRefused { .. } => RequestErrorKind::ConnectionRefused,
            Self::ConnectionFailed(_) => RequestErrorKind::ConnectionFailed,
            Self::Timeout { .. } => RequestErrorKind::Timeout,
            Self::TlsError(_) => RequestErrorKind::TlsError,
            Self::TooManyRedirects { .. } => RequestErrorKind::TooManyRedirects,
            Self::InvalidBody(_) => RequestErrorKind::InvalidBody,
            Self::FileRead { .. } => RequestErrorKind::FileRead,
            Self::Other(_) => RequestErrorKind::Unknown,
        }
    }
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Executes a prepared request and returns the response.
    ///
    /// Any status code counts as a response; only transport failures are errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, an unreadable payload file, or other HTTP-related problems.
    fn execute(
        &self,
        request: &PreparedRequest,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send;
}

/// Creates a linked cancellation token and receiver.
#[must_use]
pub fn cancellation() -> (CancellationToken, CancellationReceiver) {
    let (tx, rx) = watch::channel(false);
    (
        CancellationToken { tx: Arc::new(tx) },
        CancellationReceiver { rx },
    )
}

/// Sender side: whoever owns the Cancel button holds this.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns true once [`Self::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Receiver side, handed to the running request.
#[derive(Debug, Clone)]
pub struct CancellationReceiver {
    rx: watch::Receiver<bool>,
}

impl CancellationReceiver {
    /// A receiver that never fires.
    #[must_use]
    pub fn never() -> Self {
        let (_, receiver) = cancellation();
        receiver
    }

    /// Completes when cancellation is requested.
    ///
    /// If every token is dropped without cancelling, this never completes.
    pub async fn cancelled(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            HttpClientError::Timeout { timeout_ms: 10 }.to_error_kind(),
            RequestErrorKind::Timeout
        );
        assert_eq!(
            HttpClientError::FileRead {
                path: "a".into(),
                message: "b".into()
            }
            .to_error_kind(),
            RequestErrorKind::FileRead
        );
    }

    #[tokio::test]
    async fn test_cancel_wakes_receiver() {
        let (token, mut receiver) = cancellation();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
        tokio::time::timeout(Duration::from_secs(1), receiver.cancelled())
            .await
            .expect("receiver should observe cancellation");
    }

    #[tokio::test]
    async fn test_never_does_not_fire() {
        let mut receiver = CancellationReceiver::never();
        let result = tokio::time::timeout(Duration::from_millis(20), receiver.cancelled()).await;
        assert!(result.is_err());
    }
}
