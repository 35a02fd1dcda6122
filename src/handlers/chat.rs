//! Chat triggers: `!followers`, `!top5` and `!topviewer`.
//!
//! A trigger matches only when the whole trailing text equals its token. The
//! answer is computed on a spawned task so a slow API call never holds up the
//! read loop.

use crate::error::SyncError;
use crate::state::Bot;
use crate::telemetry::spans;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, warn};

/// A recognized chat trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTrigger {
    Followers,
    Top5,
    TopViewer,
}

impl ChatTrigger {
    /// Exact, case-sensitive match on the full message text.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "!followers" => Some(Self::Followers),
            "!top5" => Some(Self::Top5),
            "!topviewer" => Some(Self::TopViewer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Followers => "!followers",
            Self::Top5 => "!top5",
            Self::TopViewer => "!topviewer",
        }
    }
}

pub fn format_follower_count(total: u64) -> String {
    format!("I have {} followers!", total)
}

/// `1. A 2. B ...` on one line.
pub fn format_top5(ranked: &[(usize, String)]) -> String {
    ranked
        .iter()
        .map(|(rank, name)| format!("{}. {}", rank, name))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_top_viewer(username: &str, watch_time_secs: f64) -> String {
    format!(
        "{} has watched for a total of {:.2} hours!!",
        username,
        watch_time_secs / 3600.0
    )
}

/// Compute the reply to `trigger`. `None` means there is nothing to say.
pub async fn respond(bot: &Bot, trigger: ChatTrigger) -> Result<Option<String>, SyncError> {
    match trigger {
        ChatTrigger::Followers => {
            let total = bot.followers.count().await?;
            Ok(Some(format_follower_count(total)))
        }
        ChatTrigger::Top5 => {
            let ranked = bot.followers.top5();
            if ranked.is_empty() {
                return Ok(None);
            }
            Ok(Some(format_top5(&ranked)))
        }
        ChatTrigger::TopViewer => Ok(bot
            .chatters
            .top_viewer()
            .await?
            .map(|record| format_top_viewer(&record.username, record.watch_time))),
    }
}

/// Answer `trigger` in `channel` on a background task.
pub fn spawn_reply(
    bot: Arc<Bot>,
    trigger: ChatTrigger,
    channel: String,
    user: &str,
) -> JoinHandle<()> {
    crate::metrics::record_chat_command(trigger.as_str());
    let span = spans::chat_command(trigger.as_str(), user);

    tokio::spawn(
        async move {
            match respond(&bot, trigger).await {
                Ok(Some(text)) => {
                    bot.outbound.send_chat(&channel, &text);
                }
                Ok(None) => debug!("Nothing to report"),
                Err(e) => warn!(error = %e, "Chat trigger failed"),
            }
        }
        .instrument(span),
    )
}
