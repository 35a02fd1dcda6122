//! Relay line handlers.
//!
//! Exactly three commands are handled: `PING`, `376` and `PRIVMSG`. Every
//! other line is reported as unhandled by the [`Registry`].

pub mod chat;
mod connection;
mod context;
mod messaging;
mod registry;
#[cfg(test)]
pub(crate) mod testing;

pub use chat::{ChatTrigger, format_follower_count, format_top5, format_top_viewer};
pub use context::Context;
pub use registry::{Dispatch, Handler, Needs, Registry};
