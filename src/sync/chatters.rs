//! Chatter roster synchronization and watch-time accumulation.
//!
//! Every successful poll credits the time elapsed since the previous
//! successful poll to each username present in the roster. The last poll time
//! only advances after the batch commits, so a failed cycle defers its window
//! to the next success instead of losing it. A vacant roster is a successful
//! read with nobody present: its window is dropped, not deferred.

use crate::api::{ChattersResponse, Fetcher};
use crate::db::{Database, WatchTimeRecord};
use crate::error::SyncError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Result of one successful roster poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The roster reported zero chatters. Nothing was credited and the
    /// window since the previous poll is discarded.
    Vacant,
    /// `chatters` usernames were credited `elapsed` seconds each.
    Credited { chatters: usize, elapsed: f64 },
}

/// Chat roster poller.
pub struct ChatterSync {
    fetcher: Arc<dyn Fetcher>,
    url: String,
    db: Database,
    /// Channel owner, excluded from top viewer queries.
    owner: String,
    /// Held for the whole poll so two polls never credit the same window.
    last_poll: Mutex<Option<DateTime<Utc>>>,
}

impl ChatterSync {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        url: impl Into<String>,
        db: Database,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            url: url.into(),
            db,
            owner: owner.into(),
            last_poll: Mutex::new(None),
        }
    }

    /// Poll the roster and credit watch time up to now.
    pub async fn poll(&self) -> Result<PollOutcome, SyncError> {
        self.poll_at(Utc::now()).await
    }

    /// Poll the roster, treating `now` as the observation time.
    pub async fn poll_at(&self, now: DateTime<Utc>) -> Result<PollOutcome, SyncError> {
        let mut last_poll = self.last_poll.lock().await;

        let response = self
            .fetcher
            .get(&self.url, &[])
            .await
            .and_then(|r| r.error_for_status())?;
        let roster: ChattersResponse = serde_json::from_str(&response.body)?;

        if roster.chatter_count == 0 {
            debug!("Roster is vacant, nothing credited");
            *last_poll = Some(now);
            return Ok(PollOutcome::Vacant);
        }

        let elapsed = match *last_poll {
            // Clock steps backwards credit nothing rather than failing the batch.
            Some(last) => ((now - last).num_milliseconds() as f64 / 1000.0).max(0.0),
            None => 0.0,
        };

        let entries = roster.entries();
        let written = self
            .db
            .watch_time()
            .upsert_batch(&entries, elapsed, now.timestamp())
            .await?;

        *last_poll = Some(now);
        crate::metrics::record_upserts(written);
        debug!(chatters = entries.len(), elapsed, "Watch time credited");

        Ok(PollOutcome::Credited {
            chatters: entries.len(),
            elapsed,
        })
    }

    /// Viewer with the most accumulated watch time, excluding the owner.
    pub async fn top_viewer(&self) -> Result<Option<WatchTimeRecord>, SyncError> {
        Ok(self.db.watch_time().top_viewer(&self.owner).await?)
    }

    /// Time of the last poll that committed a batch or found the roster vacant.
    pub async fn last_successful_poll(&self) -> Option<DateTime<Utc>> {
        *self.last_poll.lock().await
    }
}
