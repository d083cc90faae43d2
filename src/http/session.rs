//! One request/response exchange handed to the application.

use percent_encoding::percent_decode_str;

use crate::http::error::HeaderParseError;
use crate::http::multipart::{MultipartPart, parse_multipart};
use crate::http::request::RequestHead;
use crate::http::response::ResponseHead;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub req_head: RequestHead,
    pub req_body: Vec<u8>,
    pub resp_head: ResponseHead,
    pub resp_body: Vec<u8>,
}

impl Session {
    /// A session for a parsed request with a default `200 OK` response.
    pub fn new(req_head: RequestHead, req_body: Vec<u8>) -> Self {
        Self {
            req_head,
            req_body,
            resp_head: ResponseHead::new(),
            resp_body: Vec::new(),
        }
    }

    /// Percent-decoded request path without the query string.
    ///
    /// A trailing `/` is dropped except for the root path.
    pub fn path(&self) -> String {
        let Some(dir) = self.req_head.dir() else {
            return String::new();
        };
        let raw = dir.split_once('?').map_or(dir, |(path, _)| path);
        let mut path = percent_decode_str(raw).decode_utf8_lossy().into_owned();
        if path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        path
    }

    /// Decoded query string pairs, in order.
    pub fn query(&self) -> Vec<(String, String)> {
        self.req_head
            .dir()
            .and_then(|dir| dir.split_once('?'))
            .map(|(_, query)| {
                url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `name=value` pairs from the `Cookie` header.
    pub fn cookies(&self) -> Vec<(String, String)> {
        let Some(cookie) = self.req_head.cookie() else {
            return Vec::new();
        };
        cookie
            .split("; ")
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (name.to_string(), value.to_string())
            })
            .collect()
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Decoded `application/x-www-form-urlencoded` body pairs, empty for
    /// `multipart/form-data` bodies.
    pub fn form(&self) -> Vec<(String, String)> {
        if self.req_head.content_type().has_token("multipart/form-data") {
            return Vec::new();
        }
        url::form_urlencoded::parse(&self.req_body)
            .into_owned()
            .collect()
    }

    /// Parts of a `multipart/form-data` body, `Ok(None)` for other content types.
    pub fn multipart(&self) -> Result<Option<Vec<MultipartPart>>, HeaderParseError> {
        let content_type = self.req_head.content_type();
        if !content_type.has_token("multipart/form-data") {
            return Ok(None);
        }
        let boundary = content_type
            .param_unquoted("boundary")
            .ok_or(HeaderParseError::MissingBoundary)?;
        Ok(Some(parse_multipart(&self.req_body, boundary)))
    }

    /// Appends text to the response body.
    pub fn echo(&mut self, text: &str) {
        self.resp_body.extend_from_slice(text.as_bytes());
    }

    /// Points the client at `location`; the engine answers with a 301.
    pub fn redirect(&mut self, location: &str) {
        self.resp_head.set("Location", [location]);
    }
}
