//! Integration tests for the follower and chatter syncs, driven by hand
//! against a live relay session.

mod common;

use chrono::{TimeZone, Utc};
use common::{CannedFetcher, Harness};
use std::sync::Arc;
use std::time::Duration;
use streambot::sync::PollOutcome;

const FOLLOWS_URL: &str = "http://api.test/kraken/channels/chan/follows";
const CHATTERS_URL: &str = "http://tmi.test/group/user/chan/chatters";

fn follows(names: &[&str]) -> String {
    let follows: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            serde_json::json!({
                "created_at": format!("2017-03-{:02}T12:00:00Z", i + 1),
                "user": {"_id": format!("id-{}", name), "display_name": name}
            })
        })
        .collect();
    serde_json::json!({"_total": names.len(), "follows": follows}).to_string()
}

#[tokio::test]
async fn test_new_follower_announced_in_channel() {
    let fetcher = Arc::new(CannedFetcher::new().with(FOLLOWS_URL, follows(&["A"])));
    let mut h = Harness::start_shared(fetcher.clone()).await.expect("start");

    // Baseline: silent.
    h.bot.followers.refresh(true).await.unwrap();
    h.peer
        .expect_silence(Duration::from_millis(100))
        .await
        .unwrap();

    fetcher.set(FOLLOWS_URL, follows(&["A", "B"]));
    h.bot.followers.refresh(true).await.unwrap();
    assert_eq!(h.peer.recv().await.unwrap(), "PRIVMSG #chan :B is now following!");

    // Unfollow: nothing said.
    fetcher.set(FOLLOWS_URL, follows(&["B"]));
    h.bot.followers.refresh(true).await.unwrap();
    h.peer
        .expect_silence(Duration::from_millis(100))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_watch_time_survives_a_failed_poll() {
    let roster = r#"{"chatter_count": 2, "chatters": {"broadcaster": ["chan"], "viewers": ["alice"]}}"#;
    let fetcher = Arc::new(CannedFetcher::new().with(CHATTERS_URL, roster));
    let h = Harness::start_shared(fetcher.clone()).await.expect("start");
    let t0 = Utc.timestamp_opt(1_600_000_000, 0).unwrap();

    h.bot.chatters.poll_at(t0).await.unwrap();

    // The endpoint breaks for one cycle.
    fetcher.set(CHATTERS_URL, "<html>502</html>");
    assert!(
        h.bot
            .chatters
            .poll_at(t0 + chrono::Duration::seconds(60))
            .await
            .is_err()
    );

    fetcher.set(CHATTERS_URL, roster);
    let outcome = h
        .bot
        .chatters
        .poll_at(t0 + chrono::Duration::seconds(120))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        PollOutcome::Credited {
            chatters: 2,
            elapsed: 120.0
        }
    );

    let top = h.bot.chatters.top_viewer().await.unwrap().unwrap();
    assert_eq!(top.username, "alice");
    assert_eq!(top.watch_time, 120.0);
}
