//! Error types for the relay protocol.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Extract the command token from raw line bytes (for error reporting).
///
/// Works without validating UTF-8 so that a line with a broken payload can
/// still be attributed to its command in logs.
///
/// ```ignore
/// assert_eq!(extract_command_hint(b"PRIVMSG #test hi"), Some("PRIVMSG".to_string()));
/// assert_eq!(extract_command_hint(b":server 376 nick :End"), Some("376".to_string()));
/// ```
pub(crate) fn extract_command_hint(raw_line: &[u8]) -> Option<String> {
    let mut pos = 0;

    // Skip prefix: :server or :nick!user@host (terminated by space)
    if raw_line.first() == Some(&b':') {
        while pos < raw_line.len() && raw_line[pos] != b' ' {
            pos += 1;
        }
        if pos < raw_line.len() {
            pos += 1;
        }
    }

    let cmd_start = pos;
    while pos < raw_line.len() && raw_line[pos].is_ascii_alphanumeric() {
        pos += 1;
    }

    if pos > cmd_start {
        String::from_utf8(raw_line[cmd_start..pos].to_vec()).ok()
    } else {
        None
    }
}

/// Protocol-level parse anomalies.
///
/// None of these are fatal to a session: the offending line is discarded and
/// processing continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// Line bytes are not valid UTF-8.
    #[error("invalid utf-8 at byte {byte_pos} (command: {})", command_hint.as_deref().unwrap_or("?"))]
    InvalidUtf8 {
        /// The raw line as received.
        raw_line: Vec<u8>,
        /// Offset of the first invalid byte.
        byte_pos: usize,
        /// Best-effort command token.
        command_hint: Option<String>,
    },

    /// A prefix was present but nothing followed it.
    #[error("line has no command: {raw:?}")]
    MissingCommand {
        /// The offending line.
        raw: String,
    },

    /// A line exceeded the framing limit and was dropped.
    #[error("line too long: {actual} bytes (limit {limit})")]
    LineTooLong {
        /// Bytes seen before the line was dropped.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
}

impl ProtocolError {
    /// Build an [`ProtocolError::InvalidUtf8`] from the raw bytes and decoder error.
    pub fn invalid_utf8(raw_line: &[u8], err: std::str::Utf8Error) -> Self {
        Self::InvalidUtf8 {
            raw_line: raw_line.to_vec(),
            byte_pos: err.valid_up_to(),
            command_hint: extract_command_hint(raw_line),
        }
    }
}
