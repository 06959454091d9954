//! Execute Request Use Case
//!
//! Sends one request and turns whatever happens into an
//! [`ExecutionResult`]. Nothing here returns `Err`: validation failures and
//! transport errors become [`ExecutionOutcome::Failed`], a user cancel
//! becomes [`ExecutionOutcome::Canceled`].

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use wirepad_domain::{
    ExecutionOutcome, ExecutionResult, RequestErrorKind, RequestLocation, ResponseSpec,
};

use super::prepare::{PrepareError, prepare};
use crate::ports::{CancellationReceiver, Clock, HttpClient, HttpClientError};

/// Use case for executing HTTP requests.
///
/// # Example
///
/// ```ignore
/// let use_case = ExecuteRequest::new(Arc::new(ReqwestHttpClient::new()?), Arc::new(SystemClock));
/// let located = project.find_request(&id).unwrap();
/// let result = use_case.execute(located.as_location(), CancellationReceiver::never()).await;
/// ```
pub struct ExecuteRequest<C: HttpClient, K: Clock> {
    client: Arc<C>,
    clock: Arc<K>,
}

impl<C: HttpClient, K: Clock> ExecuteRequest<C, K> {
    /// Creates a new `ExecuteRequest` use case.
    pub const fn new(client: Arc<C>, clock: Arc<K>) -> Self {
        Self { client, clock }
    }

    /// Prepares and sends the request at `location`.
    ///
    /// Completes early with [`ExecutionOutcome::Canceled`] if `cancel` fires
    /// before the response is fully read.
    pub async fn execute(
        &self,
        location: RequestLocation<'_>,
        mut cancel: CancellationReceiver,
    ) -> ExecutionResult {
        let started_at = self.clock.now();
        let started = Instant::now();
        let request_id = location.request.id.clone();

        let preparation = match prepare(location) {
            Ok(preparation) => preparation,
            Err(e) => {
                warn!(request = %location.path(), error = %e, "request rejected");
                return ExecutionResult {
                    request_id,
                    started_at,
                    elapsed: started.elapsed(),
                    outcome: prepare_failure(&e),
                    replacements: Vec::new(),
                };
            }
        };

        let prepared = &preparation.request;
        info!(method = %prepared.method, url = %prepared.url, "sending request");

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(url = %prepared.url, "request canceled");
                ExecutionOutcome::Canceled
            }
            result = self.client.execute(prepared) => completed(result),
        };

        ExecutionResult {
            request_id,
            started_at,
            elapsed: started.elapsed(),
            outcome,
            replacements: preparation.replacements,
        }
    }
}

fn prepare_failure(error: &PrepareError) -> ExecutionOutcome {
    ExecutionOutcome::failed(RequestErrorKind::InvalidUrl, error.to_string())
}

fn completed(result: Result<ResponseSpec, HttpClientError>) -> ExecutionOutcome {
    match result {
        Ok(response) => {
            info!(
                status = response.status,
                size = response.size,
                duration_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
                "response received"
            );
            ExecutionOutcome::Completed(Box::new(response))
        }
        Err(e) => {
            let kind = e.to_error_kind();
            warn!(error = %e, "request failed");
            ExecutionOutcome::failed_with_details(kind, kind.title(), e.to_string())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::cancellation;
    use chrono::{DateTime, TimeZone, Utc};
    use std::future::Future;
    use std::time::Duration;
    use wirepad_domain::{PreparedRequest, Request, Section, Variable};

    /// Mock HTTP client for testing.
    struct MockHttpClient {
        response: Result<ResponseSpec, HttpClientError>,
    }

    impl MockHttpClient {
        fn success() -> Self {
            Self {
                response: Ok(ResponseSpec::new(
                    200u16,
                    vec![("Content-Type".into(), "text/plain".into())],
                    b"OK".to_vec(),
                    Duration::from_millis(50),
                )),
            }
        }

        fn error(err: HttpClientError) -> Self {
            Self { response: Err(err) }
        }
    }

    impl HttpClient for MockHttpClient {
        async fn execute(
            &self,
            _request: &PreparedRequest,
        ) -> Result<ResponseSpec, HttpClientError> {
            self.response.clone()
        }
    }

    /// Never answers.
    struct PendingHttpClient;

    impl HttpClient for PendingHttpClient {
        fn execute(
            &self,
            _request: &PreparedRequest,
        ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send {
            std::future::pending()
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()))
    }

    fn run<C: HttpClient>(client: C) -> ExecuteRequest<C, FixedClock> {
        ExecuteRequest::new(Arc::new(client), fixed_clock())
    }

    async fn send<C: HttpClient>(
        use_case: &ExecuteRequest<C, FixedClock>,
        request: &Request,
    ) -> ExecutionResult {
        let location = RequestLocation {
            sections: &[],
            request,
        };
        use_case.execute(location, CancellationReceiver::never()).await
    }

    #[tokio::test]
    async fn test_execute_success() {
        let use_case = run(MockHttpClient::success());
        let request = Request::get("Test", "https://api.example.com/test");

        let result = send(&use_case, &request).await;

        assert_eq!(result.request_id, request.id);
        assert_eq!(result.started_at, fixed_clock().0);
        let response = result.outcome.response().expect("should complete");
        assert_eq!(response.status, 200);
        assert_eq!(response.body_text(), "OK");
    }

    #[tokio::test]
    async fn test_error_status_is_still_completed() {
        let use_case = run(MockHttpClient {
            response: Ok(ResponseSpec::new(
                404u16,
                vec![],
                vec![],
                Duration::from_millis(1),
            )),
        });
        let request = Request::get("Test", "https://api.example.com/missing");

        let result = send(&use_case, &request).await;
        assert!(result.outcome.is_completed());
    }

    #[tokio::test]
    async fn test_execute_empty_url() {
        let use_case = run(MockHttpClient::success());
        let request = Request::new("Test");

        let result = send(&use_case, &request).await;

        match result.outcome {
            ExecutionOutcome::Failed { kind, message, .. } => {
                assert_eq!(kind, RequestErrorKind::InvalidUrl);
                assert_eq!(message, "URL is required");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_invalid_url() {
        let use_case = run(MockHttpClient::success());
        let request = Request::get("Test", "not-a-valid-url");

        let result = send(&use_case, &request).await;
        assert!(result.outcome.is_failed());
    }

    #[tokio::test]
    async fn test_execute_http_error() {
        let use_case = run(MockHttpClient::error(HttpClientError::Timeout {
            timeout_ms: 5000,
        }));
        let request = Request::get("Test", "https://api.example.com/test");

        let result = send(&use_case, &request).await;

        match result.outcome {
            ExecutionOutcome::Failed { kind, details, .. } => {
                assert_eq!(kind, RequestErrorKind::Timeout);
                assert_eq!(details.as_deref(), Some("Request timed out after 5000 ms"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_yields_canceled() {
        let use_case = run(PendingHttpClient);
        let request = Request::get("Slow", "https://api.example.com/slow");
        let location = RequestLocation {
            sections: &[],
            request: &request,
        };
        let (token, receiver) = cancellation();

        let canceler = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            use_case.execute(location, receiver),
        )
        .await
        .expect("cancel should end the request");

        canceler.await.unwrap();
        assert!(result.outcome.is_canceled());
    }

    #[tokio::test]
    async fn test_replacements_are_reported() {
        let use_case = run(MockHttpClient::success());
        let section = Section::new("api").with_variable(Variable::new("host", "api.example.com"));
        let request = Request::get("Test", "https://<<host>>/test");
        let sections = [&section];
        let location = RequestLocation {
            sections: &sections,
            request: &request,
        };

        let result = use_case
            .execute(location, CancellationReceiver::never())
            .await;

        assert!(result.outcome.is_completed());
        assert_eq!(result.replacements.len(), 1);
        assert_eq!(result.replacements[0].field, "url");
    }
}
