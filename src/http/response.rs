use std::ops::{Deref, DerefMut};

use crate::http::headers::HeaderMap;

/// HTTP status codes the engine itself emits.
///
/// - `Ok` (200): default for every response
/// - `MovedPermanently` (301): application set a `Location` header
/// - `NotFound` (404): convenience for applications
/// - `MethodNotAllowed` (405): method outside the dispatch table
/// - `InternalServerError` (500): convenience for applications
/// - `HttpVersionNotSupported` (505): protocol other than HTTP/1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use fweb::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::MovedPermanently => 301,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
            StatusCode::HttpVersionNotSupported => 505,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

/// Header names that only carry request-line bookkeeping and are never written.
const PSEUDO_HEADERS: [&str; 4] = ["First-Line", "Method", "Dir", "Protocol"];

/// Status line plus headers of an outgoing response.
///
/// Dereferences to its [`HeaderMap`], so `add`/`set`/`get` work directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    headers: HeaderMap,
    pub resp_code: u16,
    pub resp_msg: String,
}

impl Default for ResponseHead {
    fn default() -> Self {
        Self {
            headers: HeaderMap::new(),
            resp_code: 200,
            resp_msg: "OK".to_string(),
        }
    }
}

impl ResponseHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, code: u16, msg: impl Into<String>) {
        self.resp_code = code;
        self.resp_msg = msg.into();
    }

    pub fn set_status_code(&mut self, status: StatusCode) {
        self.set_status(status.as_u16(), status.reason_phrase());
    }

    /// Serializes the status line and headers.
    ///
    /// The blank line ending the head is not included. The status line is
    /// always `HTTP/1.1`, and pseudo headers left over from request parsing
    /// are skipped.
    pub fn dump(&self) -> String {
        let mut out = format!("HTTP/1.1 {} {}\r\n", self.resp_code, self.resp_msg);
        for (name, values) in self.headers.iter() {
            if PSEUDO_HEADERS.iter().any(|p| p.eq_ignore_ascii_case(name)) {
                continue;
            }
            for value in values {
                out.push_str(name);
                out.push_str(": ");
                out.push_str(value);
                out.push_str("\r\n");
            }
        }
        out
    }
}

impl Deref for ResponseHead {
    type Target = HeaderMap;

    fn deref(&self) -> &HeaderMap {
        &self.headers
    }
}

impl DerefMut for ResponseHead {
    fn deref_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}
