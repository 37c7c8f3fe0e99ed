//! Timeout-bounded HTTP fetcher

use reqwest::{Client, Response, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects")]
    TooManyRedirects,
}

impl FetchError {
    /// Whether retrying the same request could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::RequestFailed(_) | FetchError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Default deadline for metadata lookups
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default deadline for health probes
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5_000);

/// HTTP client settings
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("tubemark/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Issues single GET requests, each bounded by its own deadline
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing client (shared connection settings, tests)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Issue exactly one GET and return the response as-is.
    ///
    /// Non-2xx statuses are returned untouched; interpreting them is up to the
    /// caller. If `timeout` elapses first, the in-flight request future is
    /// dropped, which cancels the request, and [`FetchError::Timeout`] is
    /// returned.
    pub async fn fetch_with_timeout(
        &self,
        url: Url,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Response> {
        debug!(url = %url, ?timeout, "Starting request");

        let mut request = self.client.get(url.clone());
        for &(name, value) in headers {
            request = request.header(name, value);
        }

        let response = tokio::time::timeout(timeout, request.send())
            .await
            .map_err(|_| FetchError::Timeout(timeout))?
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(timeout)
                } else if e.is_redirect() {
                    FetchError::TooManyRedirects
                } else {
                    FetchError::RequestFailed(e.to_string())
                }
            })?;

        debug!(url = %url, status = response.status().as_u16(), "Request completed");

        Ok(response)
    }
}

/// Build `<endpoint>?url=<target>` with the target URL-encoded
pub fn lookup_url(endpoint: &str, target: &str) -> Result<Url> {
    Url::parse_with_params(endpoint, &[("url", target)])
        .map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))
}
