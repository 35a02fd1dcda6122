//! Integration tests for the relay session lifecycle.
//!
//! Connect, authenticate, join on end of MOTD, keep-alive, and the terminal
//! behaviour when the relay goes away.

mod common;

use common::{CannedFetcher, Harness};
use std::time::Duration;
use streambot::error::ConnectionError;

#[tokio::test]
async fn test_pass_then_nick_then_join_on_376() {
    let mut h = Harness::start(CannedFetcher::new()).await.expect("start");

    h.peer
        .send_raw(":tmi.twitch.tv 001 streambot :Welcome, GLHF!")
        .await
        .unwrap();
    h.peer.send_raw(":tmi.twitch.tv 375 streambot :-").await.unwrap();
    h.peer.send_raw(":tmi.twitch.tv 376 streambot :>").await.unwrap();

    assert_eq!(h.peer.recv().await.unwrap(), "JOIN #chan");
}

#[tokio::test]
async fn test_ping_pong() {
    let mut h = Harness::start(CannedFetcher::new()).await.expect("start");

    h.peer.send_raw("PING :tmi.twitch.tv").await.unwrap();
    assert_eq!(h.peer.recv().await.unwrap(), "PONG tmi.twitch.tv");
}

#[tokio::test]
async fn test_unknown_command_does_not_block_batch() {
    let mut h = Harness::start(CannedFetcher::new()).await.expect("start");

    // Two lines in one write: the unknown one must not stop the PING.
    h.peer
        .send_bytes(b":tmi.twitch.tv WHATEVER a b :c\r\nPING :still-alive\r\n")
        .await
        .unwrap();
    assert_eq!(h.peer.recv().await.unwrap(), "PONG still-alive");
}

#[tokio::test]
async fn test_line_split_across_writes() {
    let mut h = Harness::start(CannedFetcher::new()).await.expect("start");

    h.peer.send_bytes(b"PING :split").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    h.peer.send_bytes(b"-token\r").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    h.peer.send_bytes(b"\n").await.unwrap();

    assert_eq!(h.peer.recv().await.unwrap(), "PONG split-token");
}

#[tokio::test]
async fn test_oversized_line_is_skipped() {
    let mut h = Harness::start(CannedFetcher::new()).await.expect("start");

    let mut flood = vec![b'x'; 10_000];
    flood.extend_from_slice(b"\r\nPING :after-flood\r\n");
    h.peer.send_bytes(&flood).await.unwrap();

    assert_eq!(h.peer.recv().await.unwrap(), "PONG after-flood");
}

#[tokio::test]
async fn test_relay_close_is_connection_lost() {
    let h = Harness::start(CannedFetcher::new()).await.expect("start");

    h.peer.close();
    let result = tokio::time::timeout(Duration::from_secs(5), h.session)
        .await
        .expect("session ends")
        .expect("session task");
    assert!(matches!(result, Err(ConnectionError::ConnectionLost)));
}
