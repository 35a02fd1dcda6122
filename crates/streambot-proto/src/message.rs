//! Decomposition of a single protocol line.
//!
//! A line has the shape `[:prefix ]command [params...][ :trailing]`. Parsing
//! borrows from the input; the trailing message is only allocated when it
//! has to be stitched together from several ` :` fragments.

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::error::{ProtocolError, Result};

/// Parameter list. Relay lines rarely carry more than a handful.
pub type Params<'a> = SmallVec<[&'a str; 4]>;

/// Separator between the head of a line and its trailing message.
const TRAILING_SEPARATOR: &str = " :";

/// A parsed relay line.
///
/// Transient: it borrows the frame it was parsed from and is dropped once
/// dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolLine<'a> {
    /// Origin of the line (`nick!user@host` or a server name), empty if absent.
    pub prefix: &'a str,
    /// Command token, e.g. `PRIVMSG` or `376`.
    pub command: &'a str,
    /// Space-separated parameters between the command and the trailing message.
    pub params: Params<'a>,
    /// Trailing free-text payload, trimmed of surrounding whitespace.
    pub message: Cow<'a, str>,
}

impl<'a> ProtocolLine<'a> {
    /// Parse a line.
    ///
    /// Returns `Ok(None)` for lines that are empty after trimming; those
    /// produce no event at all.
    pub fn parse(raw: &'a str) -> Result<Option<Self>> {
        let line = raw.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let (prefix, rest) = match line.strip_prefix(':') {
            Some(stripped) => match stripped.split_once(' ') {
                Some((prefix, rest)) => (prefix, rest),
                None => {
                    return Err(ProtocolError::MissingCommand {
                        raw: line.to_string(),
                    });
                }
            },
            None => ("", line),
        };

        let (head, message) = match rest.split_once(TRAILING_SEPARATOR) {
            Some((head, tail)) => (head, join_trailing(tail)),
            None => (rest, Cow::Borrowed("")),
        };

        let mut tokens = head.split(' ').filter(|t| !t.is_empty());
        let command = tokens.next().ok_or_else(|| ProtocolError::MissingCommand {
            raw: line.to_string(),
        })?;
        let params = tokens.collect();

        Ok(Some(Self {
            prefix,
            command,
            params,
            message,
        }))
    }

    /// Parse a line from raw bytes, validating UTF-8 first.
    pub fn from_bytes(raw: &'a [u8]) -> Result<Option<Self>> {
        let text = std::str::from_utf8(raw).map_err(|e| ProtocolError::invalid_utf8(raw, e))?;
        Self::parse(text)
    }

    /// Nickname part of the prefix (everything before `!`).
    pub fn nick(&self) -> &'a str {
        prefix_nick(self.prefix)
    }
}

/// Nickname part of a `nick!user@host` prefix. A prefix without `!` is
/// returned whole.
pub fn prefix_nick(prefix: &str) -> &str {
    match prefix.find('!') {
        Some(idx) => &prefix[..idx],
        None => prefix,
    }
}

/// Concatenate the ` :`-separated fragments of a trailing message and trim it.
fn join_trailing(tail: &str) -> Cow<'_, str> {
    if tail.contains(TRAILING_SEPARATOR) {
        let joined: String = tail.split(TRAILING_SEPARATOR).collect();
        Cow::Owned(joined.trim().to_string())
    } else {
        Cow::Borrowed(tail.trim())
    }
}
