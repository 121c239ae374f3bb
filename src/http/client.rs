//! HTTP transport and JSON client
//!
//! Provides a small HTTP layer that handles:
//! - GET requests with query parameters and headers
//! - Error classification for retry decisions
//! - Response body parsing

use crate::error::{Error, Result};
use crate::retry::Retrier;
use crate::types::{HeaderList, QueryParams};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HeaderList,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            default_headers: vec![("Accept".to_string(), "application/json".to_string())],
            user_agent: format!("regional-users/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((key.into(), value.into()));
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Status code and raw body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Create a new raw response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs a single HTTP GET. Transport failures map to [`Error::Http`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a GET request and return the status and body
    async fn get(&self, url: &str, query: &QueryParams, headers: &HeaderList)
        -> Result<RawResponse>;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: Client,
    config: HttpClientConfig,
}

impl ReqwestTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        query: &QueryParams,
        headers: &HeaderList,
    ) -> Result<RawResponse> {
        let mut req = self.client.get(url);

        for (key, value) in self.config.default_headers.iter().chain(headers) {
            req = req.header(key.as_str(), value.as_str());
        }

        if !query.is_empty() {
            req = req.query(query);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("GET {} -> {}", url, status);
        Ok(RawResponse { status, body })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// JSON client: retried GET followed by body parsing
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    retrier: Retrier,
}

impl ApiClient {
    /// Create a client over an arbitrary transport
    pub fn new(transport: Arc<dyn HttpTransport>, retrier: Retrier) -> Self {
        Self { transport, retrier }
    }

    /// Create a client backed by reqwest
    pub fn with_config(config: HttpClientConfig, retrier: Retrier) -> Result<Self> {
        Ok(Self::new(
            Arc::new(ReqwestTransport::with_config(config)?),
            retrier,
        ))
    }

    /// Get the retrier
    pub fn retrier(&self) -> &Retrier {
        &self.retrier
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// Transport failures, 429 and 5xx are retried; a body that is not JSON is
    /// reported as [`Error::MalformedResponse`] without retrying.
    pub async fn get_json(
        &self,
        url: &str,
        query: &QueryParams,
        headers: &HeaderList,
    ) -> Result<Value> {
        let response = self
            .retrier
            .run(|| self.attempt(url, query, headers))
            .await?;

        parse_json_body(&response.body)
    }

    async fn attempt(
        &self,
        url: &str,
        query: &QueryParams,
        headers: &HeaderList,
    ) -> Result<RawResponse> {
        let response = self.transport.get(url, query, headers).await?;
        classify_response(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("retrier", &self.retrier)
            .finish_non_exhaustive()
    }
}

/// Map error statuses to errors; success and redirects pass through
pub fn classify_response(response: RawResponse) -> Result<RawResponse> {
    match response.status {
        401 | 403 => Err(Error::auth(response.status, response.body)),
        status if status >= 400 => Err(Error::http_status(status, response.body)),
        _ => Ok(response),
    }
}

/// Parse a response body as JSON
pub fn parse_json_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Err(Error::malformed("empty response body"));
    }
    serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("failed to parse JSON from API: {e}")))
}
