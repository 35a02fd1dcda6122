//! Canned HTTP responses keyed by URL.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use streambot::api::{FetchError, FetchResponse, Fetcher};

/// Answers every GET of a known URL with the same body; unknown URLs fail.
#[derive(Default)]
pub struct CannedFetcher {
    bodies: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl CannedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` (status 200) for `url`.
    pub fn with(self, url: &str, body: impl Into<String>) -> Self {
        self.bodies.lock().insert(url.to_string(), body.into());
        self
    }

    /// Replace the body served for `url`.
    #[allow(dead_code)]
    pub fn set(&self, url: &str, body: impl Into<String>) {
        self.bodies.lock().insert(url.to_string(), body.into());
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn get(&self, url: &str, _headers: &[(&str, &str)]) -> Result<FetchResponse, FetchError> {
        self.requests.lock().push(url.to_string());
        match self.bodies.lock().get(url) {
            Some(body) => Ok(FetchResponse {
                status: 200,
                body: body.clone(),
            }),
            None => Err(FetchError::Status(404)),
        }
    }
}
