//! Integration test common infrastructure.
//!
//! Provides a fake relay to point the bot at, a canned HTTP fetcher and a
//! helper to start a bot session against both.

pub mod fetcher;
pub mod relay;

#[allow(unused_imports)]
pub use fetcher::CannedFetcher;
#[allow(unused_imports)]
pub use relay::{FakeRelay, RelayPeer};

use std::sync::Arc;
use streambot::App;
use streambot::config::Config;
use streambot::db::Database;
use streambot::error::ConnectionError;
use streambot::state::Bot;
use tokio::task::JoinHandle;

/// Minimal configuration for a bot pointed at `relay_address`.
pub fn test_config(relay_address: &str) -> Config {
    let (host, port) = relay_address
        .rsplit_once(':')
        .expect("address is host:port");
    toml::from_str(&format!(
        r#"
[relay]
host = "{host}"
port = {port}
nick = "streambot"
password = "oauth:secret"
channel = "chan"

[api]
base_url = "http://api.test/kraken"
client_id = "cid"

[roster]
base_url = "http://tmi.test"

[database]
path = ":memory:"
"#
    ))
    .expect("test config parses")
}

/// A bot session running against a fake relay.
pub struct Harness {
    pub bot: Arc<Bot>,
    pub peer: RelayPeer,
    pub session: JoinHandle<Result<(), ConnectionError>>,
}

impl Harness {
    /// Start a bot whose HTTP requests are answered by `fetcher`, and accept
    /// its relay connection. PASS and NICK have been consumed on return.
    pub async fn start(fetcher: CannedFetcher) -> anyhow::Result<Self> {
        Self::start_shared(Arc::new(fetcher)).await
    }

    /// Like [`Harness::start`], keeping a handle on the fetcher.
    pub async fn start_shared(fetcher: Arc<CannedFetcher>) -> anyhow::Result<Self> {
        let relay = FakeRelay::bind().await?;
        let config = test_config(&relay.address());
        let db = Database::new(&config.database.path).await?;

        let app = App::new(&config, fetcher, db);
        let bot = app.bot.clone();
        let session = tokio::spawn(app.connection.run());

        let mut peer = relay.accept().await?;
        anyhow::ensure!(peer.recv().await? == "PASS oauth:secret", "PASS expected first");
        anyhow::ensure!(peer.recv().await? == "NICK streambot", "NICK expected second");

        Ok(Self { bot, peer, session })
    }
}
