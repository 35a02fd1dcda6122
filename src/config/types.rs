//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Chat relay connection.
    pub relay: RelayConfig,
    /// Follower API.
    pub api: ApiConfig,
    /// Chat roster API.
    #[serde(default)]
    pub roster: RosterConfig,
    /// Polling cadence.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Read-only dashboard feed.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Relay (chat server) connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Relay hostname.
    #[serde(default = "default_relay_host")]
    pub host: String,
    /// Relay port (plaintext).
    #[serde(default = "default_relay_port")]
    pub port: u16,
    /// Nickname to register with.
    pub nick: String,
    /// Password sent with PASS (e.g. `oauth:...`).
    pub password: String,
    /// Channel to join, without the leading `#`. Also the channel owner's account name.
    pub channel: String,
}

impl RelayConfig {
    /// `host:port` for the TCP connection.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Channel name as used on the wire (`#channel`).
    pub fn irc_channel(&self) -> String {
        format!("#{}", self.channel.trim_start_matches('#'))
    }

    /// Owner account name (channel without `#`).
    pub fn owner(&self) -> &str {
        self.channel.trim_start_matches('#')
    }
}

/// Follower API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API base URL, without trailing slash.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Value for the `Client-ID` header.
    pub client_id: String,
    /// Value for the `Accept` header.
    #[serde(default = "default_api_accept")]
    pub accept: String,
}

impl ApiConfig {
    /// Follower list URL for a channel.
    pub fn followers_url(&self, channel: &str) -> String {
        format!(
            "{}/channels/{}/follows",
            self.base_url.trim_end_matches('/'),
            channel
        )
    }
}

/// Chat roster API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    /// Roster host base URL, without trailing slash.
    #[serde(default = "default_roster_base_url")]
    pub base_url: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            base_url: default_roster_base_url(),
        }
    }
}

impl RosterConfig {
    /// Chatter roster URL for a channel.
    pub fn chatters_url(&self, channel: &str) -> String {
        format!(
            "{}/group/user/{}/chatters",
            self.base_url.trim_end_matches('/'),
            channel
        )
    }
}

/// Polling cadence for the follower and chatter syncs.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Seconds between follower refreshes (default: 60).
    #[serde(default = "default_poll_interval")]
    pub follower_interval_secs: u64,
    /// Seconds between roster polls (default: 60).
    #[serde(default = "default_poll_interval")]
    pub chatter_interval_secs: u64,
    /// Per-request HTTP timeout in seconds (default: 10).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            follower_interval_secs: default_poll_interval(),
            chatter_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl SyncConfig {
    pub fn follower_interval(&self) -> Duration {
        Duration::from_secs(self.follower_interval_secs)
    }

    pub fn chatter_interval(&self) -> Duration {
        Duration::from_secs(self.chatter_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file (`:memory:` for an in-memory database).
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Dashboard feed configuration.
///
/// Convention: `port = 0` disables the HTTP endpoint (used by tests).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub port: u16,
}

fn default_relay_host() -> String {
    "irc.twitch.tv".to_string()
}

fn default_relay_port() -> u16 {
    6667
}

fn default_api_base_url() -> String {
    "https://api.twitch.tv/kraken".to_string()
}

fn default_api_accept() -> String {
    "application/vnd.twitchtv.v3+json".to_string()
}

fn default_roster_base_url() -> String {
    "https://tmi.twitch.tv".to_string()
}

fn default_poll_interval() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    10
}

fn default_database_path() -> String {
    "streambot.db".to_string()
}
