//! Request framing: locating the end of the head in a byte buffer.

use crate::http::error::HttpError;
use crate::http::request::RequestHead;

pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Offset of the first `\r\n\r\n` at or after `from`.
pub fn find_headers_end(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
        .map(|pos| pos + from)
}

/// Where the next search should start after `len` bytes were scanned
/// without a match, so a terminator split across reads is still found.
pub fn resume_offset(len: usize) -> usize {
    len.saturating_sub(HEAD_TERMINATOR.len() - 1)
}

/// Decodes and parses the head bytes (terminator excluded).
pub fn parse_head(bytes: &[u8]) -> Result<RequestHead, HttpError> {
    let text = std::str::from_utf8(bytes).map_err(|_| HttpError::InvalidEncoding)?;
    RequestHead::parse(text)
}
