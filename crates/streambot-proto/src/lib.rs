//! # streambot-proto
//!
//! Framing and parsing for the line-oriented chat relay protocol spoken by
//! streambot.
//!
//! ## Features
//!
//! - Pure splitting of a byte buffer into CR-LF delimited lines
//! - Decomposition of a line into prefix, command, params and trailing message
//! - Optional Tokio codec that buffers partial lines across reads
//!
//! ## Quick Start
//!
//! ```rust
//! use streambot_proto::ProtocolLine;
//!
//! let line = ProtocolLine::parse(":nick!user@host PRIVMSG #chan :hello there")
//!     .expect("well-formed line")
//!     .expect("non-empty line");
//!
//! assert_eq!(line.prefix, "nick!user@host");
//! assert_eq!(line.command, "PRIVMSG");
//! assert_eq!(line.params.as_slice(), ["#chan"]);
//! assert_eq!(line.message, "hello there");
//! assert_eq!(line.nick(), "nick");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod split;

pub use self::error::{ProtocolError, Result};
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::{Params, ProtocolLine, prefix_nick};
pub use self::split::{parse_batch, split_lines};

/// Line terminator used on the wire in both directions.
pub const CRLF: &[u8] = b"\r\n";
