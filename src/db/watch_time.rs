//! Watch-time repository.
//!
//! One row per chat username. `watch_time` only ever grows, `first_noticed`
//! is written once on insert, `chat_group` and `last_noticed` follow the
//! latest roster observation.

use super::DbError;
use sqlx::SqlitePool;

/// A username observed in one roster snapshot, with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub username: String,
    pub chat_group: String,
}

impl RosterEntry {
    pub fn new(username: impl Into<String>, chat_group: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            chat_group: chat_group.into(),
        }
    }
}

/// A persisted watch-time row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WatchTimeRecord {
    pub username: String,
    pub chat_group: String,
    /// Accumulated seconds.
    pub watch_time: f64,
    /// Unix timestamp of the first observation.
    pub first_noticed: i64,
    /// Unix timestamp of the latest observation.
    pub last_noticed: i64,
}

type WatchTimeRow = (String, String, f64, i64, i64);

impl From<WatchTimeRow> for WatchTimeRecord {
    fn from(
        (username, chat_group, watch_time, first_noticed, last_noticed): WatchTimeRow,
    ) -> Self {
        Self {
            username,
            chat_group,
            watch_time,
            first_noticed,
            last_noticed,
        }
    }
}

/// Repository for watch-time operations.
pub struct WatchTimeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> WatchTimeRepository<'a> {
    /// Create a new watch-time repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Credit `elapsed` seconds to every entry of one roster snapshot.
    ///
    /// Runs in a single transaction: either every username of the cycle is
    /// credited or none is. Returns the number of rows written.
    pub async fn upsert_batch(
        &self,
        entries: &[RosterEntry],
        elapsed: f64,
        now: i64,
    ) -> Result<u64, DbError> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(DbError::Internal(format!(
                "refusing to credit non-monotonic elapsed time {elapsed}"
            )));
        }

        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for entry in entries {
            let result = sqlx::query(
                r#"
                INSERT INTO watch_time (username, chat_group, watch_time, first_noticed, last_noticed)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(username) DO UPDATE SET
                    watch_time = watch_time.watch_time + excluded.watch_time,
                    chat_group = excluded.chat_group,
                    last_noticed = excluded.last_noticed
                "#,
            )
            .bind(&entry.username)
            .bind(&entry.chat_group)
            .bind(elapsed)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    /// The viewer with the most accumulated watch time, excluding `owner`.
    pub async fn top_viewer(&self, owner: &str) -> Result<Option<WatchTimeRecord>, DbError> {
        let row = sqlx::query_as::<_, WatchTimeRow>(
            r#"
            SELECT username, chat_group, watch_time, first_noticed, last_noticed
            FROM watch_time
            WHERE username != ? COLLATE NOCASE
            ORDER BY watch_time DESC, username ASC
            LIMIT 1
            "#,
        )
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(WatchTimeRecord::from))
    }

    /// Find a record by username.
    pub async fn find(&self, username: &str) -> Result<Option<WatchTimeRecord>, DbError> {
        let row = sqlx::query_as::<_, WatchTimeRow>(
            r#"
            SELECT username, chat_group, watch_time, first_noticed, last_noticed
            FROM watch_time
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(WatchTimeRecord::from))
    }

    /// Records ordered by watch time, largest first.
    pub async fn top(&self, limit: u32) -> Result<Vec<WatchTimeRecord>, DbError> {
        let rows = sqlx::query_as::<_, WatchTimeRow>(
            r#"
            SELECT username, chat_group, watch_time, first_noticed, last_noticed
            FROM watch_time
            ORDER BY watch_time DESC, username ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(WatchTimeRecord::from).collect())
    }
}
