//! Database module for persistent storage.
//!
//! Provides async SQLite database access using SQLx for the accumulated
//! viewer watch time.

mod watch_time;

pub use watch_time::{RosterEntry, WatchTimeRecord, WatchTimeRepository};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection acquire timeout - prevents a stuck writer from blocking pollers indefinitely.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum time a connection can remain idle before being closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a new database connection, running migrations if needed.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let pool = if path == ":memory:" {
            // Use a uniquely named shared-cache memory database per call.
            // `file::memory:` is global-ish and will collide across parallel tests.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:streambot-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .create_if_missing(true);

            SqlitePoolOptions::new()
                .max_connections(1)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        } else {
            // Create parent directory if it doesn't exist
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
            }

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true);

            SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        };

        info!(path = %path, "Database connected");

        Self::run_migrations(&pool).await?;

        // WAL lets dashboard reads proceed while a poll cycle is committing
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&pool)
            .await?;

        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&pool)
            .await?;

        let integrity_result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;

        if integrity_result != "ok" {
            tracing::error!(
                integrity_check = %integrity_result,
                "Database integrity check FAILED - corruption detected!"
            );
            return Err(DbError::Internal(format!(
                "integrity check failed: {}",
                integrity_result
            )));
        }

        info!("Database integrity check passed");

        Ok(Self { pool })
    }

    /// Run embedded migrations.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(DbError::Migration)?;

        info!("Database migrations checked/applied");
        Ok(())
    }

    /// Get watch-time repository.
    pub fn watch_time(&self) -> WatchTimeRepository<'_> {
        WatchTimeRepository::new(&self.pool)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::Sqlx(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err)
    }
}
