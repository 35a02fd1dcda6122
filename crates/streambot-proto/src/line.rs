//! CR-LF line codec for tokio.
//!
//! Unlike [`crate::split_lines`], the decoder keeps an incomplete trailing
//! line in the read buffer until its terminator arrives, so a line split
//! across two TCP segments is parsed once, intact.

use std::io;

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::split::find_crlf;

/// Default maximum frame length in bytes (terminator excluded).
pub const DEFAULT_MAX_LEN: usize = 8192;

/// Codec framing CR-LF terminated lines.
///
/// Decoded items are per-line results: an over-long line yields
/// `Some(Err(ProtocolError::LineTooLong))` and the stream keeps going.
/// Only I/O failures end the stream.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for a terminator
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Bytes dropped from the line currently being discarded
    discarded: usize,
}

impl LineCodec {
    /// Create a codec with the default length limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LEN)
    }

    /// Create a codec with a custom length limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarded: 0,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = Result<BytesMut, ProtocolError>;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<Self::Item>> {
        // Step back one byte: the CR may have been the last byte of the previous read.
        let start = self.next_index.saturating_sub(1).min(src.len());

        if let Some(offset) = find_crlf(&src[start..]) {
            let end = start + offset;
            let mut line = src.split_to(end + 2);
            line.truncate(end);
            self.next_index = 0;

            if self.discarded > 0 {
                let actual = self.discarded + line.len();
                self.discarded = 0;
                return Ok(Some(Err(ProtocolError::LineTooLong {
                    actual,
                    limit: self.max_len,
                })));
            }

            if line.len() > self.max_len {
                return Ok(Some(Err(ProtocolError::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                })));
            }

            return Ok(Some(Ok(line)));
        }

        if src.len() > self.max_len {
            // Drop what we have but keep a trailing CR, it may pair with the next read.
            let keep = usize::from(src.last() == Some(&b'\r'));
            let drop = src.len() - keep;
            src.advance(drop);
            self.discarded += drop;
        }
        self.next_index = src.len();

        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> io::Result<Option<Self::Item>> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }

        self.next_index = 0;
        if self.discarded > 0 {
            let actual = self.discarded + src.len();
            self.discarded = 0;
            src.clear();
            return Ok(Some(Err(ProtocolError::LineTooLong {
                actual,
                limit: self.max_len,
            })));
        }

        if src.is_empty() {
            Ok(None)
        } else {
            // An unterminated final fragment still counts as a line.
            let line = src.split_to(src.len());
            Ok(Some(Ok(line)))
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> io::Result<()> {
        dst.reserve(msg.len() + 2);
        dst.extend_from_slice(msg.as_bytes());
        if !msg.ends_with("\r\n") {
            dst.extend_from_slice(crate::CRLF);
        }
        Ok(())
    }
}
