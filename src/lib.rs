//! streambot - chat relay bot for a single streaming channel.
//!
//! Keeps one relay session open, answers keep-alives, joins the channel once
//! registration completes and serves three chat triggers. Two timer tasks
//! poll the follower and roster APIs: new followers are announced in chat and
//! every viewer present in the roster accumulates watch time in SQLite.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod network;
pub mod state;
pub mod sync;
pub mod telemetry;

use crate::api::Fetcher;
use crate::config::Config;
use crate::db::Database;
use crate::handlers::Registry;
use crate::network::{Connection, Outbound};
use crate::state::Bot;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// A wired-up bot whose relay session has not started yet.
pub struct App {
    pub bot: Arc<Bot>,
    pub connection: Connection,
}

impl App {
    /// Build the shared services and the relay connection.
    pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>, db: Database) -> Self {
        let (outbound, outbound_rx) = Outbound::channel();
        let bot = Bot::new(config, fetcher, db, outbound);
        let connection = Connection::new(
            bot.clone(),
            Arc::new(Registry::new()),
            config.relay.address(),
            config.relay.password.clone(),
            outbound_rx,
        );

        Self { bot, connection }
    }

    /// Spawn the follower and chatter timers and, when a port is set, the
    /// dashboard server.
    pub fn spawn_services(&self, config: &Config) -> Vec<JoinHandle<()>> {
        let mut tasks = vec![
            sync::spawn_follower_task(self.bot.followers.clone(), config.sync.follower_interval()),
            sync::spawn_chatter_task(self.bot.chatters.clone(), config.sync.chatter_interval()),
        ];

        let port = config.dashboard.port;
        if port != 0 {
            tasks.push(tokio::spawn(http::run_http_server(port, self.bot.clone())));
            info!(port, "Dashboard HTTP server started");
        }

        tasks
    }
}
