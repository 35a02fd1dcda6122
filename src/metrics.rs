//! Prometheus metrics collection for streambot.
//!
//! Exposed on the dashboard HTTP endpoint when it is enabled. Recording is a
//! no-op until [`init`] has run, so tests and library users pay nothing.
//!
//! - `streambot_lines_total` - Relay lines received
//! - `streambot_lines_unhandled_total` - Lines with no registered handler
//! - `streambot_parse_anomalies_total` - Lines or bodies that failed to parse
//! - `streambot_sync_polls_total{component,outcome}` - Poll cycles
//! - `streambot_sync_duration_seconds{component}` - Poll cycle latency
//! - `streambot_chat_commands_total{command}` - Chat triggers served
//! - `streambot_followers` - Follower total last reported by the API
//! - `streambot_watch_time_upserts_total` - Watch-time rows written

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Relay lines received and parsed.
pub static LINES_RECEIVED: OnceLock<IntCounter> = OnceLock::new();

/// Relay lines with no handler.
pub static LINES_UNHANDLED: OnceLock<IntCounter> = OnceLock::new();

/// Malformed relay lines or API bodies.
pub static PARSE_ANOMALIES: OnceLock<IntCounter> = OnceLock::new();

/// Watch-time rows written.
pub static WATCH_TIME_UPSERTS: OnceLock<IntCounter> = OnceLock::new();

/// Poll cycles by component and outcome.
pub static SYNC_POLLS: OnceLock<IntCounterVec> = OnceLock::new();

/// Chat triggers served.
pub static CHAT_COMMANDS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges and histograms
// ========================================================================

/// Follower total last reported by the API.
pub static FOLLOWERS: OnceLock<IntGauge> = OnceLock::new();

/// Poll cycle latency.
pub static SYNC_DURATION: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at startup before metrics are expected to show up.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::error!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(LINES_RECEIVED, IntCounter::new("streambot_lines_total", "Relay lines received"));
    register!(LINES_UNHANDLED, IntCounter::new("streambot_lines_unhandled_total", "Relay lines with no handler"));
    register!(PARSE_ANOMALIES, IntCounter::new("streambot_parse_anomalies_total", "Malformed relay lines or API bodies"));
    register!(WATCH_TIME_UPSERTS, IntCounter::new("streambot_watch_time_upserts_total", "Watch-time rows written"));
    register!(SYNC_POLLS, IntCounterVec::new(Opts::new("streambot_sync_polls_total", "Poll cycles by component and outcome"), &["component", "outcome"]));
    register!(CHAT_COMMANDS, IntCounterVec::new(Opts::new("streambot_chat_commands_total", "Chat triggers served"), &["command"]));
    register!(FOLLOWERS, IntGauge::new("streambot_followers", "Follower total last reported by the API"));
    register!(SYNC_DURATION, HistogramVec::new(
        HistogramOpts::new("streambot_sync_duration_seconds", "Poll cycle latency by component")
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["component"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

#[inline]
pub fn record_line() {
    if let Some(c) = LINES_RECEIVED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_unhandled() {
    if let Some(c) = LINES_UNHANDLED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_parse_anomaly() {
    if let Some(c) = PARSE_ANOMALIES.get() {
        c.inc();
    }
}

/// Record one poll cycle with its latency.
#[inline]
pub fn record_poll(component: &str, outcome: &str, duration_secs: f64) {
    if let Some(c) = SYNC_POLLS.get() {
        c.with_label_values(&[component, outcome]).inc();
    }
    if let Some(h) = SYNC_DURATION.get() {
        h.with_label_values(&[component]).observe(duration_secs);
    }
}

#[inline]
pub fn record_chat_command(command: &str) {
    if let Some(c) = CHAT_COMMANDS.get() {
        c.with_label_values(&[command]).inc();
    }
}

#[inline]
pub fn set_followers(total: u64) {
    if let Some(g) = FOLLOWERS.get() {
        g.set(i64::try_from(total).unwrap_or(i64::MAX));
    }
}

#[inline]
pub fn record_upserts(rows: u64) {
    if let Some(c) = WATCH_TIME_UPSERTS.get() {
        c.inc_by(rows);
    }
}
