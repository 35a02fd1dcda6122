//! streambot - chat relay bot for a single streaming channel.

use std::sync::Arc;
use streambot::App;
use streambot::api::HttpFetcher;
use streambot::config::{Config, validate};
use streambot::db::Database;
use streambot::error::ConnectionError;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("STREAMBOT_LOG_JSON").is_ok() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        channel = %config.relay.irc_channel(),
        relay = %config.relay.address(),
        "Starting streambot"
    );

    // Initialize database
    let db = Database::new(&config.database.path).await?;
    info!(path = %config.database.path, "Database ready");

    streambot::metrics::init();

    let fetcher = Arc::new(HttpFetcher::new(config.sync.request_timeout()));
    let app = App::new(&config, fetcher, db);
    let _services = app.spawn_services(&config);

    match app.connection.run().await {
        Err(ConnectionError::ConnectionLost) => {
            error!("Relay connection lost, exiting");
            Err(ConnectionError::ConnectionLost.into())
        }
        Err(e) => {
            error!(error = %e, "Relay session failed");
            Err(e.into())
        }
        Ok(()) => Ok(()),
    }
}
