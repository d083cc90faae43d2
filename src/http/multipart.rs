//! `multipart/form-data` request bodies.

use crate::http::headers::HeaderMap;
use crate::http::params::MultiParameterParser;

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub struct MultipartPart {
    pub headers: HeaderMap,
    pub content_disposition: MultiParameterParser,
    pub content_type: MultiParameterParser,
    pub body: Vec<u8>,
}

impl MultipartPart {
    /// Parses the bytes between two boundary delimiters.
    ///
    /// Returns `None` for the preamble, the closing `--` and other fragments
    /// without a blank line separating head and body.
    pub fn parse(fragment: &[u8]) -> Option<Self> {
        if fragment.len() < 5 {
            return None;
        }
        let split = find(fragment, b"\r\n\r\n")?;

        let head = &fragment[..split];
        let head = head.strip_prefix(b"\r\n").unwrap_or(head);
        let head = String::from_utf8_lossy(head);
        let headers = HeaderMap::from_lines(head.split('\n'));

        let body = &fragment[split + 4..];
        let body = body.strip_suffix(b"\r\n").unwrap_or(body);

        let mut content_disposition = MultiParameterParser::new();
        for raw in headers.get_all("Content-Disposition").unwrap_or_default() {
            content_disposition.load(raw);
        }
        let mut content_type = MultiParameterParser::new();
        for raw in headers.get_all("Content-Type").unwrap_or_default() {
            content_type.load(raw);
        }

        Some(Self {
            headers,
            content_disposition,
            content_type,
            body: body.to_vec(),
        })
    }

    /// Form field name from `Content-Disposition`.
    pub fn name(&self) -> Option<&str> {
        self.content_disposition.param_unquoted("name")
    }

    pub fn filename(&self) -> Option<&str> {
        self.content_disposition.param_unquoted("filename")
    }

    /// A plain text field: neither an uploaded file nor a nested multipart.
    pub fn is_plain_field(&self) -> bool {
        self.filename().is_none() && self.content_type.param("boundary").is_none()
    }
}

/// Splits `body` on `--{boundary}` and parses every real part.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Vec<MultipartPart> {
    let delimiter = format!("--{boundary}");
    split(body, delimiter.as_bytes())
        .into_iter()
        .filter_map(MultipartPart::parse)
        .collect()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn split<'a>(mut haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    while let Some(idx) = find(haystack, needle) {
        parts.push(&haystack[..idx]);
        haystack = &haystack[idx + needle.len()..];
    }
    parts.push(haystack);
    parts
}
