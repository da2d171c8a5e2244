//! HTTP transport for the management API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use tokio::time::sleep;
use tracing::warn;

use super::{ApiRequest, ManagementApi, RawResponse};
use crate::error::ProviderError;

/// Receives every request and response passing through an [`HttpClient`].
///
/// Observers never see the API token; it lives only in the default headers.
pub trait TrafficObserver: Send + Sync {
    /// Called before each attempt is sent.
    fn on_request(&self, url: &Url, request: &ApiRequest, attempt: u32);

    /// Called after each attempt that produced a response.
    fn on_response(&self, url: &Url, response: &RawResponse, elapsed: Duration);
}

/// Exponential backoff for throttled and failing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub min_wait: Duration,
    /// Upper bound for a single wait.
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that sends each request exactly once.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Wait before retry number `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.min_wait.saturating_mul(factor).min(self.max_wait)
    }

    /// Whether a response status is worth retrying.
    ///
    /// Throttling and server errors are retried, except `501 Not Implemented`.
    pub fn should_retry(&self, status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS
            || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
    }

    fn should_retry_error(&self, err: &reqwest::Error) -> bool {
        err.is_connect() || err.is_timeout()
    }
}

/// Builder for [`HttpClient`].
#[derive(Default)]
pub struct HttpClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    retry: RetryPolicy,
    timeout: Option<Duration>,
    observers: Vec<Arc<dyn TrafficObserver>>,
}

impl HttpClientBuilder {
    /// Set the API base URL, e.g. `https://mapi.storyblok.com`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the personal access token sent in the `Authorization` header.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the retry policy.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Register a traffic observer.
    pub fn observer(mut self, observer: Arc<dyn TrafficObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] for a missing or malformed base
    /// URL or a token that is not a valid header value.
    pub fn build(self) -> Result<HttpClient, ProviderError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ProviderError::Configuration("base url is required".to_string()))?;
        Url::parse(&base_url).map_err(|e| {
            ProviderError::Configuration(format!("invalid base url {:?}: {}", base_url, e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&token).map_err(|_| {
                ProviderError::Configuration("token is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpClient {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: self.retry,
            observers: self.observers,
        })
    }
}

/// [`ManagementApi`] over HTTPS with retries.
pub struct HttpClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
    observers: Vec<Arc<dyn TrafficObserver>>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl HttpClient {
    /// Start building a client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    fn url(&self, path: &str) -> Result<Url, ProviderError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw)
            .map_err(|e| ProviderError::Configuration(format!("invalid url {:?}: {}", raw, e)))
    }

    async fn send_once(
        &self,
        url: &Url,
        request: &ApiRequest,
    ) -> Result<RawResponse, reqwest::Error> {
        let mut builder = self.client.request(request.method.clone(), url.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl ManagementApi for HttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ProviderError> {
        let url = self.url(&request.path)?;
        let mut attempt = 0;
        loop {
            for observer in &self.observers {
                observer.on_request(&url, &request, attempt);
            }
            let started = tokio::time::Instant::now();
            let retries_left = attempt < self.retry.max_retries;

            match self.send_once(&url, &request).await {
                Ok(response) => {
                    for observer in &self.observers {
                        observer.on_response(&url, &response, started.elapsed());
                    }
                    if !(retries_left && self.retry.should_retry(response.status)) {
                        return Ok(response);
                    }
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        status = response.status.as_u16(),
                        attempt,
                        "retrying request"
                    );
                }
                Err(err) => {
                    if !(retries_left && self.retry.should_retry_error(&err)) {
                        return Err(err.into());
                    }
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        error = %err,
                        attempt,
                        "retrying request"
                    );
                }
            }

            sleep(self.retry.backoff(attempt)).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one scripted status per connection; the last one repeats.
    async fn scripted_server(statuses: Vec<u16>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let status = statuses[n.min(statuses.len() - 1)];

                let mut request = Vec::<u8>::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(k) => request.extend_from_slice(&buf[..k]),
                    }
                }

                let body = r#"{"component":{"id":1}}"#;
                let response = format!(
                    "HTTP/1.1 {} Scripted\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    #[derive(Default)]
    struct CountingObserver {
        requests: AtomicUsize,
        responses: AtomicUsize,
        last_attempt: AtomicU32,
    }

    impl TrafficObserver for CountingObserver {
        fn on_request(&self, _url: &Url, _request: &ApiRequest, attempt: u32) {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.last_attempt.store(attempt, Ordering::SeqCst);
        }

        fn on_response(&self, _url: &Url, _response: &RawResponse, _elapsed: Duration) {
            self.responses.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fast_retries(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            min_wait: Duration::from_millis(1),
            max_wait: Duration::from_millis(5),
        }
    }

    fn client_for(
        base_url: &str,
        retry: RetryPolicy,
        observer: Arc<CountingObserver>,
    ) -> HttpClient {
        HttpClient::builder()
            .base_url(base_url)
            .token("secret")
            .retry_policy(retry)
            .timeout(Duration::from_secs(5))
            .observer(observer)
            .build()
            .unwrap()
    }

    fn get_component() -> ApiRequest {
        ApiRequest::new(Method::GET, "/v1/spaces/1/components/1")
    }

    #[tokio::test]
    async fn test_execute_retries_throttling_and_server_errors() {
        let (base_url, hits) = scripted_server(vec![503, 429, 200]).await;
        let observer = Arc::new(CountingObserver::default());
        let client = client_for(&base_url, fast_retries(5), Arc::clone(&observer));

        let response = client.execute(get_component()).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(observer.requests.load(Ordering::SeqCst), 3);
        assert_eq!(observer.responses.load(Ordering::SeqCst), 3);
        assert_eq!(observer.last_attempt.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_execute_returns_last_response_when_retries_run_out() {
        let (base_url, hits) = scripted_server(vec![503]).await;
        let observer = Arc::new(CountingObserver::default());
        let client = client_for(&base_url, fast_retries(2), Arc::clone(&observer));

        let response = client.execute(get_component()).await.unwrap();

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(observer.requests.load(Ordering::SeqCst), 3);
        assert_eq!(observer.responses.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_does_not_retry_client_errors() {
        let (base_url, hits) = scripted_server(vec![422, 200]).await;
        let observer = Arc::new(CountingObserver::default());
        let client = client_for(&base_url, fast_retries(5), Arc::clone(&observer));

        let response = client.execute(get_component()).await.unwrap();

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(observer.requests.load(Ordering::SeqCst), 1);
        assert_eq!(observer.responses.load(Ordering::SeqCst), 1);
        assert_eq!(observer.last_attempt.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_backoff_doubles_until_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(16));
        assert_eq!(policy.backoff(5), Duration::from_secs(30));
        assert_eq!(policy.backoff(40), Duration::from_secs(30));
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(policy.should_retry(StatusCode::BAD_GATEWAY));
        assert!(policy.should_retry(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!policy.should_retry(StatusCode::NOT_IMPLEMENTED));
        assert!(!policy.should_retry(StatusCode::NOT_FOUND));
        assert!(!policy.should_retry(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!policy.should_retry(StatusCode::CREATED));
    }

    #[test]
    fn test_builder_requires_base_url() {
        let err = HttpClient::builder().build().unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));

        let err = HttpClient::builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = HttpClient::builder()
            .base_url("https://mapi.storyblok.com/")
            .token("secret")
            .retry_policy(RetryPolicy::none())
            .build()
            .unwrap();
        let url = client.url("/v1/spaces/1/components/2").unwrap();
        assert_eq!(url.as_str(), "https://mapi.storyblok.com/v1/spaces/1/components/2");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = HttpClient::builder()
            .base_url("https://mapi.storyblok.com")
            .token("super-secret")
            .build()
            .unwrap();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }
}
