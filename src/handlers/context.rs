//! Handler context.
//!
//! Defines the [`Context`] passed to every line handler: the shared bot
//! services plus the connection's lifecycle publisher.

use crate::error::{HandlerError, HandlerResult};
use crate::network::ConnectionState;
use crate::state::Bot;
use std::sync::Arc;
use tokio::sync::watch;

/// Handler context passed to each line handler.
pub struct Context<'a> {
    /// Shared bot services.
    pub bot: &'a Arc<Bot>,
    /// Lifecycle of the connection that received the line.
    pub state: &'a watch::Sender<ConnectionState>,
}

impl<'a> Context<'a> {
    pub fn new(bot: &'a Arc<Bot>, state: &'a watch::Sender<ConnectionState>) -> Self {
        Self { bot, state }
    }

    /// Queue a raw line for the relay.
    pub fn send(&self, line: impl Into<String>) -> HandlerResult {
        if self.bot.outbound.send(line) {
            Ok(())
        } else {
            Err(HandlerError::OutboundClosed)
        }
    }

    /// Publish a lifecycle transition.
    pub fn set_state(&self, next: ConnectionState) {
        let prev = self.state.send_replace(next);
        if prev != next {
            tracing::debug!(from = ?prev, to = ?next, "Connection state changed");
        }
    }
}
