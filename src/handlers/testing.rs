//! Test fixture: a [`Bot`] wired to a scripted fetcher and an in-memory
//! database, with its outbound queue captured.

use super::Context;
use crate::api::testing::{ScriptedFetcher, ok};
use crate::api::{FetchError, FetchResponse};
use crate::config::Config;
use crate::db::Database;
use crate::network::{ConnectionState, Outbound, OutboundReceiver};
use crate::state::Bot;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

pub(crate) const TEST_CONFIG: &str = r#"
[relay]
nick = "streambot"
password = "oauth:secret"
channel = "chan"

[api]
client_id = "cid"
"#;

pub(crate) struct TestBot {
    pub bot: Arc<Bot>,
    pub state: watch::Sender<ConnectionState>,
    rx: Mutex<OutboundReceiver>,
}

impl TestBot {
    /// Every API request fails.
    pub async fn new() -> Self {
        Self::with_responses(vec![]).await
    }

    /// The first API request returns `body`.
    pub async fn with_follows(body: &str) -> Self {
        Self::with_responses(vec![ok(body.to_string())]).await
    }

    pub async fn with_responses(responses: Vec<Result<FetchResponse, FetchError>>) -> Self {
        let config: Config = toml::from_str(TEST_CONFIG).unwrap();
        let db = Database::new(":memory:").await.unwrap();
        let (outbound, rx) = Outbound::channel();
        let bot = Bot::new(&config, ScriptedFetcher::new(responses), db, outbound);
        let (state, _) = watch::channel(ConnectionState::Authenticating);

        Self {
            bot,
            state,
            rx: Mutex::new(rx),
        }
    }

    pub fn ctx(&self) -> Context<'_> {
        Context::new(&self.bot, &self.state)
    }

    /// Lines queued so far.
    pub fn drain(&self) -> Vec<String> {
        let mut rx = self.rx.lock();
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }
}
