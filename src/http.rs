//! Dashboard feed and Prometheus endpoint.
//!
//! Runs on a separate tokio task when `dashboard.port` is set. Everything is
//! read-only JSON for the external dashboard; no pages are rendered here.

use crate::db::WatchTimeRecord;
use crate::state::Bot;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Default and maximum rows for `/api/watchtime`.
const DEFAULT_WATCHTIME_LIMIT: u32 = 10;
const MAX_WATCHTIME_LIMIT: u32 = 100;

#[derive(Debug, Serialize)]
struct RankedFollower {
    rank: usize,
    name: String,
}

#[derive(Debug, Serialize)]
struct FollowerSummary {
    /// Followers held in the last snapshot.
    cached: usize,
    /// Total last reported by the API.
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WatchTimeQuery {
    limit: Option<u32>,
}

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

async fn top5_handler(State(bot): State<Arc<Bot>>) -> Json<Vec<RankedFollower>> {
    Json(
        bot.followers
            .top5()
            .into_iter()
            .map(|(rank, name)| RankedFollower { rank, name })
            .collect(),
    )
}

async fn followers_handler(State(bot): State<Arc<Bot>>) -> Json<FollowerSummary> {
    Json(FollowerSummary {
        cached: bot.followers.cached_len(),
        total: bot.followers.cached_total(),
    })
}

async fn watchtime_handler(
    State(bot): State<Arc<Bot>>,
    Query(query): Query<WatchTimeQuery>,
) -> Result<Json<Vec<WatchTimeRecord>>, StatusCode> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_WATCHTIME_LIMIT)
        .min(MAX_WATCHTIME_LIMIT);

    bot.db.watch_time().top(limit).await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "Watch-time query failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn topviewer_handler(
    State(bot): State<Arc<Bot>>,
) -> Result<Json<Option<WatchTimeRecord>>, StatusCode> {
    bot.chatters.top_viewer().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "Top viewer query failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Build the dashboard router.
pub fn router(bot: Arc<Bot>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/api/followers", get(followers_handler))
        .route("/api/followers/top5", get(top5_handler))
        .route("/api/watchtime", get(watchtime_handler))
        .route("/api/topviewer", get(topviewer_handler))
        .with_state(bot)
}

/// Serve the dashboard on an already bound listener.
pub async fn serve(listener: TcpListener, bot: Arc<Bot>) {
    if let Err(e) = axum::serve(listener, router(bot)).await {
        tracing::error!("HTTP server error: {}", e);
    }
}

/// Run the dashboard HTTP server.
///
/// Binds to `0.0.0.0:port`. This is a long-running task that should be
/// spawned in the background.
pub async fn run_http_server(port: u16, bot: Arc<Bot>) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind HTTP server on {}: {}", addr, e);
            return;
        }
    };
    tracing::info!("Dashboard HTTP server listening on {}", addr);

    serve(listener, bot).await;
}
