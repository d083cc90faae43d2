//! Error types for the HTTP engine.

/// Errors that end a connection before (or instead of) a response.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Peer closed the socket before a complete head or body arrived.
    #[error("connection closed by peer")]
    ConnectionClosed,

    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    #[error("request head is not valid UTF-8")]
    InvalidEncoding,

    #[error("timed out waiting for request data")]
    ReadTimeout,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while parsing the substructure of a single header value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeaderParseError {
    #[error("invalid quality weight: {0:?}")]
    InvalidQuality(String),

    #[error("multipart body without boundary parameter")]
    MissingBoundary,
}
