//! HTTP client with tracing and per-call deadlines.
//!
//! This module provides:
//! - [`HttpGet`] - The GET capability the fetcher depends on
//! - [`HttpClient`] - A reqwest-backed implementation
//! - [`HttpResponse`] - Status, headers and body of a completed call

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::HttpError;

/// Identifying client header sent with every request.
///
/// Subscription panels gate the usage header (and the structured payload)
/// on a known proxy-client user agent.
pub const DEFAULT_USER_AGENT: &str = "FlClash/v0.8.76 clash-verge";

/// Default per-call deadline.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

// ============================================================================
// Response
// ============================================================================

/// A completed HTTP exchange.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body decoded as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response with the given status and body and no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Returns true for status 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Returns a header value, decoded lossily. Lookup is case-insensitive.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
    }
}

// ============================================================================
// GET capability
// ============================================================================

/// The network capability used by the fetch pipeline.
///
/// Implementations must honour `timeout` for the whole exchange, body
/// included.
#[async_trait]
pub trait HttpGet: Send + Sync {
    /// Performs a GET request and reads the full body.
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// reqwest-backed [`HttpGet`] that follows redirects and sends a fixed
/// user agent.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a client sending [`DEFAULT_USER_AGENT`].
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Creates a client with a custom user agent.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if the TLS backend cannot be initialised.
    pub fn with_user_agent(user_agent: &str) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self { inner: client })
    }
}

/// Maps a reqwest error to the short transport taxonomy.
fn classify(err: reqwest::Error, timeout: Duration) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout(timeout)
    } else if err.is_connect() {
        let host = err
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown host")
            .to_string();
        HttpError::Connect(host)
    } else {
        HttpError::Request(err.without_url())
    }
}

#[async_trait]
impl HttpGet for HttpClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
        debug!("GET request");

        let response = self
            .inner
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        debug!(status, "Response received");

        let body = response.text().await.map_err(|e| classify(e, timeout))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
