//! Follower synchronization.
//!
//! Polls the follower list, keeps the latest snapshot in memory and announces
//! followers that were not in the previous snapshot. A failed refresh leaves
//! the snapshot untouched.

use crate::api::{Fetcher, FollowEntry, FollowsResponse};
use crate::error::SyncError;
use crate::network::Outbound;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Number of entries reported by [`FollowerSync::top5`].
const TOP_FOLLOWERS: usize = 5;

/// A channel follower.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Follower {
    pub user_id: String,
    pub display_name: String,
    pub followed_at: DateTime<Utc>,
}

impl TryFrom<FollowEntry> for Follower {
    type Error = SyncError;

    fn try_from(entry: FollowEntry) -> Result<Self, Self::Error> {
        let followed_at = DateTime::parse_from_rfc3339(&entry.created_at)
            .map_err(|e| {
                SyncError::Malformed(format!("bad created_at {:?}: {}", entry.created_at, e))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            user_id: entry.user.id.into_string(),
            display_name: entry.user.display_name,
            followed_at,
        })
    }
}

/// The last successfully fetched follower list, in API order.
#[derive(Debug, Clone)]
struct FollowerSnapshot {
    followers: Vec<Follower>,
    total: u64,
}

/// Result of one successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Total reported by the API.
    pub total: u64,
    /// Followers held in the new snapshot.
    pub cached: usize,
    /// Display names announced by this refresh.
    pub announced: Vec<String>,
}

/// Where and how to fetch followers.
#[derive(Debug, Clone)]
pub struct FollowersEndpoint {
    pub url: String,
    pub accept: String,
    pub client_id: String,
}

/// Follower list poller and cache.
pub struct FollowerSync {
    fetcher: Arc<dyn Fetcher>,
    endpoint: FollowersEndpoint,
    /// Channel announcements go to (`#channel`).
    channel: String,
    outbound: Outbound,
    snapshot: RwLock<Option<FollowerSnapshot>>,
    /// Held from fetch to swap so a slow response never replaces a newer one.
    refresh_lock: Mutex<()>,
}

impl FollowerSync {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        endpoint: FollowersEndpoint,
        channel: impl Into<String>,
        outbound: Outbound,
    ) -> Self {
        Self {
            fetcher,
            endpoint,
            channel: channel.into(),
            outbound,
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Fetch the follower list and replace the snapshot.
    ///
    /// With `notify`, every follower absent from the previous snapshot is
    /// announced in chat. The first successful refresh only sets the
    /// baseline and never announces.
    pub async fn refresh(&self, notify: bool) -> Result<RefreshOutcome, SyncError> {
        let _serial = self.refresh_lock.lock().await;

        let body = self.fetch().await?;
        let total = body.total;
        let followers = body
            .follows
            .into_iter()
            .map(Follower::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let cached = followers.len();

        let fresh: Vec<String> = {
            let mut guard = self.snapshot.write();
            let fresh = match guard.as_ref() {
                Some(old) if notify => {
                    let known: HashSet<&str> =
                        old.followers.iter().map(|f| f.user_id.as_str()).collect();
                    followers
                        .iter()
                        .filter(|f| !known.contains(f.user_id.as_str()))
                        .map(|f| f.display_name.clone())
                        .collect()
                }
                _ => Vec::new(),
            };
            *guard = Some(FollowerSnapshot { followers, total });
            fresh
        };

        for name in &fresh {
            info!(follower = %name, "New follower");
            self.outbound
                .send_chat(&self.channel, &format!("{} is now following!", name));
        }

        crate::metrics::set_followers(total);
        debug!(total, cached, announced = fresh.len(), "Follower snapshot replaced");

        Ok(RefreshOutcome {
            total,
            cached,
            announced: fresh,
        })
    }

    /// The five earliest followers as `(rank, display_name)`, rank starting at 1.
    ///
    /// Ties keep snapshot order.
    pub fn top5(&self) -> Vec<(usize, String)> {
        let guard = self.snapshot.read();
        let Some(snapshot) = guard.as_ref() else {
            return Vec::new();
        };

        let mut ordered: Vec<&Follower> = snapshot.followers.iter().collect();
        ordered.sort_by_key(|f| f.followed_at);
        ordered
            .into_iter()
            .take(TOP_FOLLOWERS)
            .enumerate()
            .map(|(idx, f)| (idx + 1, f.display_name.clone()))
            .collect()
    }

    /// Refresh without announcing and return the API's follower total.
    pub async fn count(&self) -> Result<u64, SyncError> {
        self.refresh(false).await.map(|outcome| outcome.total)
    }

    /// Total from the last successful refresh, without fetching.
    pub fn cached_total(&self) -> Option<u64> {
        self.snapshot.read().as_ref().map(|s| s.total)
    }

    /// Number of followers held in the snapshot.
    pub fn cached_len(&self) -> usize {
        self.snapshot
            .read()
            .as_ref()
            .map_or(0, |s| s.followers.len())
    }

    async fn fetch(&self) -> Result<FollowsResponse, SyncError> {
        let headers = [
            ("Accept", self.endpoint.accept.as_str()),
            ("Client-ID", self.endpoint.client_id.as_str()),
        ];
        let response = self
            .fetcher
            .get(&self.endpoint.url, &headers)
            .await
            .and_then(|r| r.error_for_status())?;

        Ok(serde_json::from_str(&response.body)?)
    }
}
