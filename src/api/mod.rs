//! HTTP polling seam for the follower and roster APIs.
//!
//! The syncs only need "GET this URL with these headers, give me status and
//! body". [`Fetcher`] is that contract; [`HttpFetcher`] is the reqwest-backed
//! implementation used in production, tests substitute scripted fetchers.

pub mod models;
#[cfg(test)]
pub(crate) mod testing;

pub use models::{ChattersResponse, FollowEntry, FollowsResponse};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Transient fetch failures. Never fatal: the cycle is skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Status and body of a completed GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn non-2xx responses into [`FetchError::Status`].
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status(self.status))
        }
    }
}

/// Issues HTTP GET requests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse, FetchError>;
}

/// reqwest-backed [`Fetcher`].
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("streambot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client, falling back to defaults");
                reqwest::Client::new()
            });

        Self { client, timeout }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        // Outer timeout also bounds body streaming
        let response = match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => return Err(FetchError::Request(e.to_string())),
            Err(_) => return Err(FetchError::Timeout(self.timeout)),
        };

        let status = response.status().as_u16();
        let body = match tokio::time::timeout(self.timeout, response.text()).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => return Err(FetchError::Request(e.to_string())),
            Err(_) => return Err(FetchError::Timeout(self.timeout)),
        };

        debug!(url = %url, status, bytes = body.len(), "HTTP GET completed");
        Ok(FetchResponse { status, body })
    }
}
