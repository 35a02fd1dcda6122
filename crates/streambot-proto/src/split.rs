//! Stateless splitting of a byte buffer into lines.
//!
//! This is the read-boundary-agnostic form of framing: every call stands on
//! its own, and a trailing fragment without CR-LF is returned as one more
//! line. Sessions use [`crate::LineCodec`], which buffers partial lines.

use crate::error::Result;
use crate::message::ProtocolLine;

/// Iterator over the CR-LF separated lines of a buffer.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match find_crlf(rest) {
            Some(idx) => {
                self.rest = Some(&rest[idx + 2..]);
                Some(&rest[..idx])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

/// Position of the first CR-LF in `buf`.
pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == crate::CRLF)
}

/// Split `buf` on CR-LF.
///
/// Empty fragments are yielded too; [`ProtocolLine::parse`] skips them.
pub fn split_lines(buf: &[u8]) -> Lines<'_> {
    Lines { rest: Some(buf) }
}

/// Split and parse a whole buffer, skipping blank lines.
///
/// Each element is either a parsed line or the anomaly that line produced,
/// in arrival order.
pub fn parse_batch(buf: &[u8]) -> Vec<Result<ProtocolLine<'_>>> {
    split_lines(buf)
        .filter_map(|raw| ProtocolLine::from_bytes(raw).transpose())
        .collect()
}
