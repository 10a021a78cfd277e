//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The `Fetcher` seam the crawl loop is written against
//! - Building the shared HTTP client
//! - GET requests with per-crawl headers and timeout
//! - Error classification

use crate::TransportError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Connection establishment limit, independent of the per-fetch timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// One page request
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// URL to fetch
    pub url: &'a Url,
    /// Headers to send
    pub headers: &'a HeaderMap,
    /// Upper bound on the whole request
    pub timeout: Duration,
}

/// A fetched page
///
/// Any status code is returned here; deciding what counts as failure is
/// the caller's job.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Page body content
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves pages for the crawler
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches one page
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResponse)` - A response arrived (any status)
    /// * `Err(TransportError)` - Network failure, timeout or unreadable body
    async fn fetch(&self, request: FetchRequest<'_>) -> Result<FetchResponse, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// Headers and the overall timeout are applied per request, so one client
/// can serve crawls with different configurations.
///
/// # Example
///
/// ```no_run
/// use webscrape::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest<'_>) -> Result<FetchResponse, TransportError> {
        let url_str = request.url.to_string();

        let response = self
            .client
            .get(request.url.clone())
            .headers(request.headers.clone())
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify_error(&url_str, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url_str.clone(),
                }
            } else {
                TransportError::Body {
                    url: url_str.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(FetchResponse {
            final_url,
            status,
            content_type,
            body,
        })
    }
}

/// Classifies a reqwest send error
fn classify_error(url: &str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
