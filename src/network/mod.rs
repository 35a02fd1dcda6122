//! Network module.
//!
//! Contains the relay [`Connection`] and the [`Outbound`] queue that feeds it.

mod connection;
mod outbound;

pub use connection::{Connection, ConnectionState};
pub use outbound::{Outbound, OutboundReceiver, format_privmsg};
