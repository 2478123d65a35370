//! # Hexfolio Net
//!
//! Fetch abstraction for the Hexfolio offline cache worker.
//!
//! ## Design Goals
//!
//! 1. **Async fetching**: non-blocking network requests
//! 2. **Mockable seam**: the [`Fetcher`] trait lets cache strategies run
//!    against a scripted fetcher in tests
//! 3. **Thin types**: [`Request`]/[`Response`] carry only what the cache
//!    worker needs (method, URL, headers, status, body)

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors that can occur while fetching.
#[derive(Error, Debug)]
pub enum NetError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// An outgoing request as seen by the cache worker.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
}

impl Request {
    /// Create a GET request.
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            headers: HeaderMap::new(),
        }
    }

    /// Create a request with an explicit method.
    pub fn with_method(method: Method, url: Url) -> Self {
        Self {
            url,
            method,
            headers: HeaderMap::new(),
        }
    }

    /// Add a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Check if this is a GET request.
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Get the URL path.
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// A fetched response.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    /// Check if the response has an ok (2xx) status.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Get a header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get content-type from headers.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the body as text.
    pub fn text(&self) -> Result<String, NetError> {
        String::from_utf8(self.body.to_vec()).map_err(|e| NetError::RequestFailed(e.to_string()))
    }
}

/// Abstraction over network fetching.
///
/// The cache worker only ever talks to the network through this trait, so
/// strategy behavior can be exercised with a scripted implementation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform a request and return the response.
    async fn fetch(&self, request: &Request) -> Result<Response, NetError>;
}

/// Fetcher configuration.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// User agent string.
    pub user_agent: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum redirects.
    pub max_redirects: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("HexfolioWorker/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
        }
    }
}

/// Real fetcher backed by reqwest.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher.
    pub fn new(config: FetcherConfig) -> Result<Self, NetError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| NetError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, NetError> {
        debug!(method = %request.method, url = %request.url, "fetching");

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = request.url.clone();
        let body = response.bytes().await?;

        Ok(Response {
            url,
            status,
            headers,
            body,
        })
    }
}
