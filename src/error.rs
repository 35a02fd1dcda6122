//! Unified error handling for streambot.
//!
//! Each component owns one error enum. None of them cross task boundaries:
//! sync errors are logged by the timer task that produced them, handler
//! errors by the read loop, and only [`ConnectionError`] reaches `main`.

use crate::api::FetchError;
use crate::db::DbError;
use thiserror::Error;

// ============================================================================
// Handler Errors (line dispatch)
// ============================================================================

/// Errors that can occur while handling a relay line.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters for {0}")]
    NeedMoreParams(&'static str),
    #[error("outbound queue closed")]
    OutboundClosed,
}

/// Result type for line handlers.
pub type HandlerResult<T = ()> = Result<T, HandlerError>;

// ============================================================================
// Sync Errors (periodic polling)
// ============================================================================

/// Errors from one follower or chatter polling cycle.
///
/// All variants are recovered locally: the cycle is skipped and the prior
/// state kept.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network or HTTP status failure.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    /// Response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// Watch-time upsert failed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] DbError),
}

impl SyncError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch_error",
            Self::Malformed(_) => "parse_anomaly",
            Self::Persistence(_) => "persistence_error",
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Malformed(err.to_string())
    }
}

// ============================================================================
// Connection Errors (relay session)
// ============================================================================

/// Relay session errors. All of them end the session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("relay i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The relay closed the stream. No reconnect is attempted.
    #[error("connection lost")]
    ConnectionLost,
}
