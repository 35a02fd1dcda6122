//! `PRIVMSG` handler.

use super::Context;
use super::chat::{self, ChatTrigger};
use crate::error::{HandlerError, HandlerResult};
use streambot_proto::prefix_nick;
use tracing::info;

/// Inbound chat message. Triggers are answered in the channel they came
/// from; anything else is logged.
pub fn privmsg(ctx: &Context<'_>, prefix: &str, params: &[&str], message: &str) -> HandlerResult {
    let channel = params
        .first()
        .copied()
        .ok_or(HandlerError::NeedMoreParams("PRIVMSG"))?;
    let user = prefix_nick(prefix);

    match ChatTrigger::parse(message) {
        Some(trigger) => {
            info!(channel = %channel, user = %user, trigger = trigger.as_str(), "Chat trigger");
            chat::spawn_reply(ctx.bot.clone(), trigger, channel.to_string(), user);
        }
        None => info!(channel = %channel, user = %user, text = %message, "Chat message"),
    }
    Ok(())
}
