//! Telemetry utilities for sync cycle timing and tracing spans.

use std::time::Instant;

/// Times one poll cycle and records it when finished.
pub struct CycleTimer {
    component: &'static str,
    start: Instant,
}

impl CycleTimer {
    /// Start timing a cycle of `component` (`followers` or `chatters`).
    pub fn start(component: &'static str) -> Self {
        Self {
            component,
            start: Instant::now(),
        }
    }

    /// Record the cycle under `outcome` and return its duration in seconds.
    pub fn finish(self, outcome: &str) -> f64 {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_poll(self.component, outcome, duration);
        duration
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span for the relay session.
    pub fn connection(address: &str, channel: &str) -> Span {
        info_span!("connection", address = %address, channel = %channel)
    }

    /// Span for one periodic sync cycle.
    pub fn sync_cycle(component: &'static str) -> Span {
        info_span!("sync", component = component)
    }

    /// Span for a chat trigger's asynchronous work.
    pub fn chat_command(trigger: &str, user: &str) -> Span {
        info_span!("chat_command", trigger = %trigger, user = %user)
    }
}
