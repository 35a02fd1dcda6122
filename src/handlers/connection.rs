//! Connection-level handlers: keep-alive and end of registration.

use super::Context;
use crate::error::{HandlerError, HandlerResult};
use crate::network::ConnectionState;
use tracing::{debug, info};

/// `PING` - answer with `PONG` echoing the token.
///
/// The token is the trailing message, or the first param when the relay
/// sends it without a colon.
pub fn ping(ctx: &Context<'_>, params: &[&str], message: &str) -> HandlerResult {
    let token = if message.is_empty() {
        params
            .first()
            .copied()
            .ok_or(HandlerError::NeedMoreParams("PING"))?
    } else {
        message
    };

    debug!(token = %token, "PONG");
    ctx.send(format!("PONG {}", token))
}

/// `376` (end of MOTD) - registration is done, join the channel.
pub fn end_of_motd(ctx: &Context<'_>) -> HandlerResult {
    let channel = &ctx.bot.channel;
    info!(channel = %channel, "Registered, joining channel");
    ctx.send(format!("JOIN {}", channel))?;
    ctx.set_state(ConnectionState::Ready);
    Ok(())
}
