//! Periodic synchronization with the follower and roster APIs.
//!
//! Each sync runs on its own timer task. A cycle that fails is logged and
//! counted, then the task waits for the next tick; nothing is retried
//! immediately and no error leaves the task.

pub mod chatters;
pub mod followers;

pub use chatters::{ChatterSync, PollOutcome};
pub use followers::{Follower, FollowerSync, FollowersEndpoint, RefreshOutcome};

use crate::telemetry::{CycleTimer, spans};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, debug, warn};

/// Ticks immediately, then every `period`. A slow cycle delays the next tick
/// instead of bunching up missed ones.
fn timer(period: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Spawn the follower refresh loop (`refresh(notify = true)` every `period`).
pub fn spawn_follower_task(sync: Arc<FollowerSync>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = timer(period);
        loop {
            interval.tick().await;
            let timer = CycleTimer::start("followers");
            match sync.refresh(true).instrument(spans::sync_cycle("followers")).await {
                Ok(outcome) => {
                    timer.finish("ok");
                    debug!(
                        total = outcome.total,
                        announced = outcome.announced.len(),
                        "Follower refresh completed"
                    );
                }
                Err(e) => {
                    timer.finish(e.error_code());
                    warn!(error = %e, "Follower refresh skipped");
                }
            }
        }
    })
}

/// Spawn the chatter poll loop.
pub fn spawn_chatter_task(sync: Arc<ChatterSync>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = timer(period);
        loop {
            interval.tick().await;
            let timer = CycleTimer::start("chatters");
            match sync.poll().instrument(spans::sync_cycle("chatters")).await {
                Ok(PollOutcome::Vacant) => {
                    timer.finish("vacant");
                    debug!("Roster empty, no watch time credited");
                }
                Ok(PollOutcome::Credited { chatters, elapsed }) => {
                    timer.finish("ok");
                    debug!(chatters, elapsed, "Chatter poll completed");
                }
                Err(e) => {
                    timer.finish(e.error_code());
                    warn!(error = %e, "Chatter poll skipped, window deferred");
                }
            }
        }
    })
}
