use std::ops::Deref;

use tracing::warn;
use url::Url;

use crate::http::error::HttpError;
use crate::http::headers::HeaderMap;
use crate::http::params::MultiParameterParser;
use crate::http::quality::QualityValueParser;

/// HTTP request methods the engine dispatches on.
///
/// Anything else is answered with 405 Method Not Allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive, uppercase)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches a known method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use fweb::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("PATCH"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            _ => None,
        }
    }
}

/// A parsed request line plus headers.
///
/// The request line is kept in the header map under the synthetic names
/// `METHOD`, `DIR` and `PROTOCOL`, so `head.get("method")` works like any
/// other header lookup. Typed views are derived once, at construction.
#[derive(Debug, Clone, Default)]
pub struct RequestHead {
    headers: HeaderMap,
    method: Option<String>,
    dir: Option<String>,
    protocol: Option<String>,
    accept: QualityValueParser,
    accept_charset: QualityValueParser,
    accept_encoding: QualityValueParser,
    accept_language: QualityValueParser,
    content_type: MultiParameterParser,
    authorization: Option<String>,
    connection: Option<String>,
    cookie: Option<String>,
    upgrade: Option<String>,
    user_agent: Option<String>,
    referer: Option<String>,
    host: Option<String>,
}

impl RequestHead {
    /// Parses the text before the blank line that ends a request head.
    ///
    /// The first line is taken as a request line unless it looks like a
    /// `Key: value` header, in which case every line is a header. Empty
    /// text gives an empty head.
    pub fn parse(text: &str) -> Result<Self, HttpError> {
        let text = text.strip_suffix("\r\n\r\n").unwrap_or(text);
        let text = text.replace('\r', "");
        let mut lines = text.split('\n');
        let mut headers = HeaderMap::new();

        let first = lines.next().unwrap_or_default();
        if is_request_line(first) {
            let parts: Vec<&str> = first.split(' ').collect();
            let [method, dir, protocol] = parts.as_slice() else {
                return Err(HttpError::MalformedRequestLine(first.to_string()));
            };
            headers.add("METHOD", *method);
            headers.add("DIR", *dir);
            headers.add("PROTOCOL", *protocol);
        } else {
            headers.add_line(first);
        }

        for line in lines {
            headers.add_line(line);
        }

        Ok(Self::from_headers(headers))
    }

    /// Derives the typed views from an already populated header map.
    pub fn from_headers(headers: HeaderMap) -> Self {
        let first = |name: &str| headers.get(name).map(str::to_string);

        Self {
            method: headers.get("METHOD").map(str::to_ascii_uppercase),
            dir: first("DIR"),
            protocol: headers.get("PROTOCOL").map(str::to_ascii_uppercase),
            accept: load_quality(&headers, "Accept"),
            accept_charset: load_quality(&headers, "Accept-Charset"),
            accept_encoding: load_quality(&headers, "Accept-Encoding"),
            accept_language: load_quality(&headers, "Accept-Language"),
            content_type: load_params(&headers, "Content-Type"),
            authorization: first("Authorization"),
            connection: first("Connection"),
            cookie: first("Cookie"),
            upgrade: first("Upgrade"),
            user_agent: first("User-Agent"),
            referer: first("Referer"),
            host: first("Host"),
            headers,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Upper-cased method token, `None` when the head had no request line.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn method_kind(&self) -> Option<Method> {
        self.method().and_then(Method::from_str)
    }

    /// Request target, verbatim.
    pub fn dir(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    pub fn accept(&self) -> &QualityValueParser {
        &self.accept
    }

    pub fn accept_charset(&self) -> &QualityValueParser {
        &self.accept_charset
    }

    pub fn accept_encoding(&self) -> &QualityValueParser {
        &self.accept_encoding
    }

    pub fn accept_language(&self) -> &QualityValueParser {
        &self.accept_language
    }

    pub fn content_type(&self) -> &MultiParameterParser {
        &self.content_type
    }

    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    pub fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn upgrade(&self) -> Option<&str> {
        self.upgrade.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Declared body length, `Ok(None)` when the header is absent.
    pub fn content_length(&self) -> Result<Option<usize>, HttpError> {
        self.headers
            .get("Content-Length")
            .map(|v| {
                v.trim()
                    .parse()
                    .map_err(|_| HttpError::InvalidContentLength(v.to_string()))
            })
            .transpose()
    }

    /// The request target resolved against `Host` (or `localhost`).
    pub fn url(&self) -> Option<Url> {
        let dir = self.dir()?;
        let host = self.host().filter(|h| !h.is_empty()).unwrap_or("localhost");
        Url::parse(&format!("http://{host}/")).ok()?.join(dir).ok()
    }
}

impl Deref for RequestHead {
    type Target = HeaderMap;

    fn deref(&self) -> &HeaderMap {
        &self.headers
    }
}

/// A real header line has no space before its first `": "`.
fn is_request_line(line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    match line.find(": ") {
        None => true,
        Some(idx) => line[..idx].contains(' '),
    }
}

fn load_quality(headers: &HeaderMap, name: &str) -> QualityValueParser {
    let mut parser = QualityValueParser::new();
    for raw in headers.get_all(name).unwrap_or_default() {
        if let Err(err) = parser.load(raw) {
            warn!(header = name, value = %raw, error = %err, "Ignoring malformed header value");
        }
    }
    parser
}

fn load_params(headers: &HeaderMap, name: &str) -> MultiParameterParser {
    let mut parser = MultiParameterParser::new();
    for raw in headers.get_all(name).unwrap_or_default() {
        parser.load(raw);
    }
    parser
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_heuristic() {
        assert!(is_request_line("GET / HTTP/1.1"));
        assert!(is_request_line("GET /a: b HTTP/1.1"));
        assert!(!is_request_line("Host: example.com"));
        assert!(!is_request_line(""));
    }
}
