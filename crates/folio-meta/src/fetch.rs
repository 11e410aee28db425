//! Outbound HTTP behind a trait.
//!
//! The resolvers only see [`Fetcher`]; production uses [`HttpFetcher`]
//! (reqwest) and tests use [`StaticFetcher`] with canned responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use url::Url;

use crate::error::FetchError;

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of redirects followed.
pub const MAX_REDIRECTS: usize = 10;

/// A fetched response, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// URL after following redirects.
    pub final_url: Url,
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response body as text.
    pub body: String,
}

impl FetchResponse {
    /// Build a 200 response with the given content type.
    pub fn ok(final_url: Url, content_type: &str, body: impl Into<String>) -> Self {
        Self {
            final_url,
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    /// Set the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the declared content type is in the JSON family
    /// (`application/json`, `application/ld+json`, ...).
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
    }
}

/// Abstraction over an HTTP GET that follows redirects.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url`, following redirects, and read the whole body.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// `User-Agent` header.
    pub user_agent: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`Fetcher`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given options.
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e.to_string()))?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e.to_string()))?;

        tracing::debug!(%url, %final_url, status, "fetched");
        Ok(FetchResponse {
            final_url,
            status,
            content_type,
            body,
        })
    }
}

/// [`Fetcher`] that serves canned responses and records calls.
///
/// Unknown URLs fail with a transport error. Keys are normalised through
/// [`Url`] so `https://a.test` and `https://a.test/` are the same entry.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    routes: Arc<HashMap<String, Result<FetchResponse, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(url: &str) -> String {
        Url::parse(url)
            .map(String::from)
            .unwrap_or_else(|_| url.to_string())
    }

    fn route(mut self, url: &str, outcome: Result<FetchResponse, String>) -> Self {
        Arc::make_mut(&mut self.routes).insert(Self::key(url), outcome);
        self
    }

    /// Serve `response` for `url`.
    pub fn with_response(self, url: &str, response: FetchResponse) -> Self {
        self.route(url, Ok(response))
    }

    /// Serve an HTML page for `url` (no redirect).
    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with_body(url, "text/html; charset=utf-8", html)
    }

    /// Serve a JSON body for `url` (no redirect).
    pub fn with_json(self, url: &str, json: &str) -> Self {
        self.with_body(url, "application/json", json)
    }

    /// Serve `body` with `content_type` for `url` (no redirect).
    pub fn with_body(self, url: &str, content_type: &str, body: &str) -> Self {
        let outcome = Url::parse(url)
            .map(|u| FetchResponse::ok(u, content_type, body))
            .map_err(|e| format!("route is not a URL: {e}"));
        self.route(url, outcome)
    }

    /// Fail requests to `url` with a transport error.
    pub fn with_failure(self, url: &str, message: &str) -> Self {
        self.route(url, Err(message.to_string()))
    }

    /// Total number of requests made.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Number of requests made to `url`.
    pub async fn calls_to(&self, url: &str) -> usize {
        let key = Self::key(url);
        self.calls.lock().await.iter().filter(|c| **c == key).count()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let key = url.to_string();
        self.calls.lock().await.push(key.clone());

        match self.routes.get(&key) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(FetchError::transport(key, message.clone())),
            None => Err(FetchError::transport(key, "no canned response")),
        }
    }
}
