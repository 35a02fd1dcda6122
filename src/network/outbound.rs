//! Outbound line queue.
//!
//! Any component may hold an [`Outbound`] and queue lines for the relay.
//! Sending is fire-and-forget: there is no acknowledgement and no
//! backpressure beyond the socket buffer. A single writer task owned by the
//! connection drains the queue in order.

use tokio::sync::mpsc;
use tracing::warn;

/// Cloneable handle for queueing outbound relay lines.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::UnboundedSender<String>,
}

/// Receiving side, consumed by the connection's writer.
pub type OutboundReceiver = mpsc::UnboundedReceiver<String>;

impl Outbound {
    /// Create a handle and the queue it feeds.
    pub fn channel() -> (Self, OutboundReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a raw line. CR-LF is appended if missing.
    ///
    /// Returns `false` when the connection is gone and the line was dropped.
    pub fn send(&self, line: impl Into<String>) -> bool {
        let mut line = line.into();
        if !line.ends_with("\r\n") {
            line.push_str("\r\n");
        }

        if self.tx.send(line).is_err() {
            warn!("Outbound queue closed, dropping line");
            return false;
        }
        true
    }

    /// Queue a chat message to `channel` (a leading `#` is added if missing).
    pub fn send_chat(&self, channel: &str, text: &str) -> bool {
        self.send(format_privmsg(channel, text))
    }

    /// Whether the writer side is still alive.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Relay message-send line for `channel`.
pub fn format_privmsg(channel: &str, text: &str) -> String {
    if channel.starts_with('#') {
        format!("PRIVMSG {} :{}", channel, text)
    } else {
        format!("PRIVMSG #{} :{}", channel, text)
    }
}
