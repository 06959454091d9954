//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication for the application.

use std::error::Error as _;
use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Url};
use tracing::debug;
use wirepad_application::ports::{HttpClient, HttpClientError};
use wirepad_domain::request::MultipartPart;
use wirepad_domain::{ClientSettings, HttpMethod, PreparedBody, PreparedRequest, ResponseSpec};

/// HTTP client implementation using reqwest.
///
/// Wraps a `reqwest::Client` configured from [`ClientSettings`] and
/// implements the `HttpClient` port from the application layer.
pub struct ReqwestHttpClient {
    client: Client,
    settings: ClientSettings,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        Self::with_settings(ClientSettings::default())
    }

    /// Creates a new HTTP client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn with_settings(settings: ClientSettings) -> Result<Self, HttpClientError> {
        let redirect = if settings.max_redirects == 0 {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(settings.max_redirects)
        };

        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .redirect(redirect)
            .timeout(Duration::from_millis(settings.timeout_ms))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// Returns the settings this client was built with.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Trace => Method::TRACE,
        }
    }

    /// Parses the URL and appends the query pairs in order.
    fn build_url(url: &str, query: &[(String, String)]) -> Result<Url, HttpClientError> {
        let mut parsed =
            Url::parse(url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;
        if !query.is_empty() {
            parsed.query_pairs_mut().extend_pairs(query);
        }
        Ok(parsed)
    }

    /// Attaches the prepared body, reading files from disk.
    async fn build_body(
        builder: RequestBuilder,
        request: &PreparedRequest,
    ) -> Result<RequestBuilder, HttpClientError> {
        match &request.body {
            PreparedBody::None => Ok(builder),

            PreparedBody::Text(content) => Ok(builder.body(content.clone())),

            PreparedBody::File(path) => {
                let bytes = read_payload_file(path).await?;
                let builder = if request.header("content-type").is_none() {
                    let guessed = mime_guess::from_path(path).first_or_octet_stream();
                    builder.header("Content-Type", guessed.essence_str())
                } else {
                    builder
                };
                Ok(builder.body(bytes))
            }

            PreparedBody::UrlEncoded(pairs) => {
                let encoded = serde_urlencoded::to_string(pairs)
                    .map_err(|e| HttpClientError::InvalidBody(e.to_string()))?;
                Ok(builder.body(encoded))
            }

            PreparedBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    form = match part {
                        MultipartPart::Text { name, value } => {
                            form.text(name.clone(), value.clone())
                        }
                        MultipartPart::File { name, path } => {
                            form.part(name.clone(), file_part(path).await?)
                        }
                    };
                }
                Ok(builder.multipart(form))
            }
        }
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(&self, error: &reqwest::Error) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout {
                timeout_ms: self.settings.timeout_ms,
            };
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects {
                max: self.settings.max_redirects,
            };
        }

        let message = error_chain(error);
        let lower = message.to_lowercase();
        let host = error
            .url()
            .and_then(|u| u.host_str().map(ToString::to_string))
            .unwrap_or_else(|| "unknown".to_string());

        if error.is_connect() {
            if lower.contains("dns") || lower.contains("resolve") || lower.contains("lookup") {
                return HttpClientError::DnsError { host, message };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host,
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            if lower.contains("certificate") || lower.contains("tls") {
                return HttpClientError::TlsError(message);
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_body() || error.is_decode() {
            return HttpClientError::InvalidBody(message);
        }

        HttpClientError::Other(message)
    }
}

/// Joins an error with its sources; reqwest keeps the useful part deep.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

async fn read_payload_file(path: &str) -> Result<Vec<u8>, HttpClientError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| HttpClientError::FileRead {
            path: path.to_string(),
            message: e.to_string(),
        })
}

async fn file_part(path: &str) -> Result<Part, HttpClientError> {
    let bytes = read_payload_file(path).await?;
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())
        .map_err(|e| HttpClientError::InvalidBody(e.to_string()))
}

impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &PreparedRequest) -> Result<ResponseSpec, HttpClientError> {
        let url = Self::build_url(&request.url, &request.query)?;
        debug!(method = %request.method, %url, "dispatching");

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = Self::build_body(builder, request).await?;

        // Start timing
        let start = Instant::now();

        let response = builder.send().await.map_err(|e| self.map_error(&e))?;
        let status = response.status().as_u16();

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(&e))?
            .to_vec();

        let duration = start.elapsed();

        Ok(ResponseSpec::new(status, headers, body, duration))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn prepared(url: &str) -> PreparedRequest {
        PreparedRequest {
            request_id: "r1".to_string(),
            method: HttpMethod::Post,
            url: url.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: PreparedBody::None,
        }
    }

    fn body_bytes(builder: RequestBuilder) -> Vec<u8> {
        let built = builder.build().unwrap();
        built
            .body()
            .and_then(reqwest::Body::as_bytes)
            .map(<[u8]>::to_vec)
            .unwrap_or_default()
    }

    /// True once the head and a `Content-Length` body have arrived.
    fn request_complete(received: &[u8]) -> bool {
        let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&received[..end]).to_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        received.len() >= end + 4 + length
    }

    /// Serves one canned response and returns the raw request it received.
    async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut received = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&received) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&received).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Trace),
            Method::TRACE
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        let client = ReqwestHttpClient::new().unwrap();
        assert_eq!(client.settings().max_redirects, 10);

        let no_redirects = ReqwestHttpClient::with_settings(ClientSettings {
            max_redirects: 0,
            ..ClientSettings::default()
        });
        assert!(no_redirects.is_ok());
    }

    #[test]
    fn test_build_url_appends_query_in_order() {
        let url = ReqwestHttpClient::build_url(
            "https://example.com/search?fixed=1",
            &[
                ("q".to_string(), "a b".to_string()),
                ("page".to_string(), "2".to_string()),
            ],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/search?fixed=1&q=a+b&page=2"
        );
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        let result = ReqwestHttpClient::build_url("::not a url::", &[]);
        assert!(matches!(result, Err(HttpClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_sent_verbatim() {
        let mut request = prepared("https://example.com");
        request.headers.push(("Content-Type".into(), "application/json".into()));
        request.body = PreparedBody::Text(r#"{"id": <<petId>>}"#.into());
        let builder = Client::new().post("https://example.com");
        let builder = ReqwestHttpClient::build_body(builder, &request).await.unwrap();
        assert_eq!(body_bytes(builder), br#"{"id": <<petId>>}"#.to_vec());
    }

    #[tokio::test]
    async fn test_malformed_json_body_reaches_server() {
        let (base, server) = serve_once(
            "HTTP/1.1 204 No Content\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let client = ReqwestHttpClient::new().unwrap();
        let mut request = prepared(&format!("{base}/pets"));
        request.headers.push(("Content-Type".into(), "application/vnd.api+json".into()));
        request.body = PreparedBody::Text("{not json".into());

        let response = client.execute(&request).await.unwrap();
        assert_eq!(response.status, 204);

        let raw = server.await.unwrap();
        assert!(raw.ends_with("\r\n\r\n{not json"), "server saw {raw:?}");
    }

    #[tokio::test]
    async fn test_url_encoded_body() {
        let mut request = prepared("https://example.com");
        request.body = PreparedBody::UrlEncoded(vec![
            ("name".into(), "wire pad".into()),
            ("x".into(), "1&2".into()),
        ]);
        let builder = Client::new().post("https://example.com");
        let builder = ReqwestHttpClient::build_body(builder, &request).await.unwrap();
        assert_eq!(body_bytes(builder), b"name=wire+pad&x=1%262".to_vec());
    }

    #[tokio::test]
    async fn test_file_body_is_read_and_typed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        std::fs::write(&path, br#"{"a":1}"#).unwrap();

        let mut request = prepared("https://example.com");
        request.body = PreparedBody::File(path.to_string_lossy().into_owned());
        let builder = Client::new().post("https://example.com");
        let builder = ReqwestHttpClient::build_body(builder, &request).await.unwrap();
        let built = builder.build().unwrap();
        assert_eq!(
            built.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(built.body().and_then(reqwest::Body::as_bytes), Some(&br#"{"a":1}"#[..]));
    }

    #[tokio::test]
    async fn test_missing_file_is_file_read_error() {
        let mut request = prepared("https://example.com");
        request.body = PreparedBody::File("/definitely/not/here.bin".into());
        let builder = Client::new().post("https://example.com");
        let result = ReqwestHttpClient::build_body(builder, &request).await;
        assert!(matches!(result, Err(HttpClientError::FileRead { .. })));
    }

    #[tokio::test]
    async fn test_execute_captures_response() {
        let (base, server) = serve_once(
            "HTTP/1.1 201 Created\r\nContent-Type: text/plain\r\nX-Trace: abc\r\n\
             Content-Length: 2\r\nConnection: close\r\n\r\nhi",
        )
        .await;

        let client = ReqwestHttpClient::new().unwrap();
        let mut request = prepared(&format!("{base}/items"));
        request.query.push(("page".into(), "1".into()));
        request.headers.push(("X-Client".into(), "wirepad".into()));

        let response = client.execute(&request).await.unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(response.body_text(), "hi");
        assert_eq!(response.header("x-trace"), Some("abc"));
        assert_eq!(response.content_type.as_deref(), Some("text/plain"));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /items?page=1 HTTP/1.1"));
        assert!(raw.to_lowercase().contains("x-client: wirepad"));
    }

    #[tokio::test]
    async fn test_closed_port_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ReqwestHttpClient::new().unwrap();
        let mut request = prepared(&format!("http://{addr}/"));
        request.method = HttpMethod::Get;
        let error = client.execute(&request).await.unwrap_err();
        assert!(
            matches!(
                error,
                HttpClientError::ConnectionRefused { .. } | HttpClientError::ConnectionFailed(_)
            ),
            "unexpected error {error:?}"
        );
    }
}
