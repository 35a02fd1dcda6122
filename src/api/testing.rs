//! Scripted [`Fetcher`] for unit tests.

use super::{FetchError, FetchResponse, Fetcher};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Replays scripted responses in order and records request headers.
///
/// Once the script runs out every request fails.
pub(crate) struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<FetchResponse, FetchError>>>,
    headers: Mutex<Vec<Vec<(String, String)>>>,
    urls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new(responses: Vec<Result<FetchResponse, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            headers: Mutex::new(Vec::new()),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn seen_headers(&self) -> Vec<Vec<(String, String)>> {
        self.headers.lock().clone()
    }

    pub(crate) fn seen_urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse, FetchError> {
        self.urls.lock().push(url.to_string());
        self.headers.lock().push(
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Request("script exhausted".into())))
    }
}

/// A 200 response carrying `body`.
pub(crate) fn ok(body: String) -> Result<FetchResponse, FetchError> {
    Ok(FetchResponse { status: 200, body })
}

/// [`ScriptedFetcher`] that can park one request until the test releases it.
///
/// The parked request takes its scripted response before waiting, so
/// responses are still handed out in arrival order.
pub(crate) struct HeldFetcher {
    inner: Arc<ScriptedFetcher>,
    hold: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl HeldFetcher {
    pub(crate) fn new(responses: Vec<Result<FetchResponse, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            inner: ScriptedFetcher::new(responses),
            hold: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
        })
    }

    /// Park the next request.
    pub(crate) fn hold_next(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Wait until the parked request has taken its response.
    pub(crate) async fn entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl Fetcher for HeldFetcher {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse, FetchError> {
        let response = self.inner.get(url, headers).await;
        if self.hold.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        response
    }
}
