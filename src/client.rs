//! Core HTTP client for the option-chain backend REST API.
//!
//! The [`ChainClient`] struct is the entry point for every backend endpoint.
//! It wraps [`reqwest::Client`] with JSON default headers and provides typed
//! `get`, `post` and `post_no_content` methods.
//!
//! Endpoint methods are added to `ChainClient` via `impl` blocks in the
//! [`crate::api`] module.

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::constants::API_BASE_URL;
use crate::error::{ApiErrorBody, ChainError, Result};

/// Core HTTP client for the option-chain backend.
///
/// Cloning is cheap: the underlying connection pool is shared.
///
/// # Example
///
/// ```no_run
/// use chainboard::client::ChainClient;
///
/// # #[tokio::main]
/// # async fn main() -> chainboard::error::Result<()> {
/// let client = ChainClient::new();
/// let stocks = client.list_stocks().await?;
/// println!("{:?}", stocks.symbols);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChainClient {
    http: reqwest::Client,
    /// Base URL for REST API requests (defaults to [`API_BASE_URL`]).
    base_url: String,
}

impl Default for ChainClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainClient {
    /// Create a new `ChainClient` against the default local backend.
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL)
    }

    /// Create a new `ChainClient` pointing at a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .default_headers(Self::default_headers())
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Returns a reference to the underlying `reqwest::Client`.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Generic HTTP helpers
    // -----------------------------------------------------------------------

    /// Perform a GET request and deserialize the JSON response.
    pub async fn get<R: DeserializeOwned>(&self, url: Url) -> Result<R> {
        tracing::debug!(%url, "GET");
        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    /// Perform a POST request with a JSON body and deserialize the response.
    pub async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<R> {
        tracing::debug!(%url, "POST");
        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    /// Perform a POST request whose response body is irrelevant.
    pub async fn post_no_content<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<()> {
        tracing::debug!(%url, "POST (no content)");
        let resp = self.http.post(url).json(body).send().await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(self.parse_error_body(status, &body))
        }
    }

    /// Build an endpoint URL from path segments and optional query pairs.
    ///
    /// Segments are percent-encoded individually, so user-supplied symbols
    /// and search queries can be passed through verbatim. Query pairs whose
    /// value is `None` are omitted.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, Option<&str>)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| {
                ChainError::InvalidArgument(format!("base URL cannot hold a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        let present: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(k, v)| v.map(|v| (*k, v)))
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }
        Ok(url)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Default headers applied to every request.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Read a response, returning either the deserialized body or a `ChainError`.
    async fn handle_response<R: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<R> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            serde_json::from_slice(&bytes).map_err(ChainError::Json)
        } else {
            let body = String::from_utf8_lossy(&bytes);
            Err(self.parse_error_body(status, &body))
        }
    }

    /// Try to parse the backend's `{"detail": ...}` error structure; fall back
    /// to a raw HTTP status error.
    pub(crate) fn parse_error_body(&self, status: reqwest::StatusCode, body: &str) -> ChainError {
        if let Ok(api_err) = serde_json::from_str::<ApiErrorBody>(body) {
            if api_err.detail.is_some() {
                return ChainError::Api(api_err);
            }
        }
        ChainError::HttpStatus {
            status,
            body: body.to_owned(),
        }
    }
}
