use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::debug;

use crate::app::Application;
use crate::config::ConnectionConfig;
use crate::http::error::HttpError;
use crate::http::parser::{HEAD_TERMINATOR, find_headers_end, parse_head, resume_offset};
use crate::http::request::{Method, RequestHead};
use crate::http::response::StatusCode;
use crate::http::session::Session;
use crate::http::writer::ResponseWriter;

pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const ALLOWED_METHODS: &str = "OPTIONS, GET, POST, PUT, DELETE, HEAD";

/// Drives one accepted connection through its keep-alive loop.
pub struct Connection<S, A: ?Sized> {
    stream: S,
    buffer: BytesMut,
    app: Arc<A>,
    config: ConnectionConfig,
    state: ConnectionState,
    keep_alive_times: usize,
}

pub enum ConnectionState {
    AwaitingHead,
    AwaitingBody { head: RequestHead, expected: usize },
    Dispatching(Session),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S, A> Connection<S, A>
where
    S: AsyncRead + AsyncWrite + Unpin,
    A: Application + ?Sized,
{
    pub fn new(stream: S, app: Arc<A>, config: ConnectionConfig) -> Self {
        Self {
            buffer: BytesMut::with_capacity(config.read_buffer_size),
            stream,
            app,
            config,
            state: ConnectionState::AwaitingHead,
            keep_alive_times: 0,
        }
    }

    /// Number of request heads received so far.
    pub fn requests_served(&self) -> usize {
        self.keep_alive_times
    }

    /// Serves requests until the peer closes, a response carries
    /// `Connection: close`, or an error ends the connection.
    ///
    /// A peer closing mid-request is not an error. Framing errors and
    /// application errors are returned without writing a response.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);
            self.state = match state {
                ConnectionState::AwaitingHead => match self.read_head().await {
                    Ok(head) => {
                        self.keep_alive_times += 1;
                        match head.content_length()? {
                            Some(expected) => ConnectionState::AwaitingBody { head, expected },
                            None => ConnectionState::Dispatching(Session::new(head, Vec::new())),
                        }
                    }
                    Err(HttpError::ConnectionClosed) => {
                        if self.buffer.is_empty() {
                            debug!("Client closed connection");
                        } else {
                            debug!(
                                buffered = self.buffer.len(),
                                "Connection closed before request head completed"
                            );
                        }
                        ConnectionState::Closed
                    }
                    Err(e) => return Err(e.into()),
                },

                ConnectionState::AwaitingBody { head, expected } => {
                    match self.read_body(expected).await {
                        Ok(body) => ConnectionState::Dispatching(Session::new(head, body)),
                        Err(HttpError::ConnectionClosed) => {
                            debug!(expected, "Connection closed before request body completed");
                            ConnectionState::Closed
                        }
                        Err(e) => return Err(e.into()),
                    }
                }

                ConnectionState::Dispatching(mut session) => {
                    dispatch(&*self.app, &mut session)?;
                    let keep_alive = finalize_response(
                        &mut session,
                        self.keep_alive_times,
                        self.config.max_keep_alive,
                    );

                    debug!(
                        method = session.req_head.method().unwrap_or_default(),
                        dir = session.req_head.dir().unwrap_or_default(),
                        status = session.resp_head.resp_code,
                        keep_alive,
                        "Request handled"
                    );

                    let writer = ResponseWriter::new(&session.resp_head, &session.resp_body);
                    ConnectionState::Writing(writer, keep_alive)
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if keep_alive {
                        ConnectionState::AwaitingHead // go back for next request
                    } else {
                        ConnectionState::Closed
                    }
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    async fn read_head(&mut self) -> Result<RequestHead, HttpError> {
        let mut scanned = 0;
        loop {
            if let Some(end) = find_headers_end(&self.buffer, scanned) {
                let head = self.buffer.split_to(end);
                self.buffer.advance(HEAD_TERMINATOR.len());
                return parse_head(&head);
            }
            scanned = resume_offset(self.buffer.len());
            self.fill_buffer().await?;
        }
    }

    async fn read_body(&mut self, expected: usize) -> Result<Vec<u8>, HttpError> {
        while self.buffer.len() < expected {
            self.fill_buffer().await?;
        }
        Ok(self.buffer.split_to(expected).to_vec())
    }

    async fn fill_buffer(&mut self) -> Result<(), HttpError> {
        let limit = self.config.read_timeout();
        self.buffer.reserve(self.config.read_buffer_size.max(1));

        let read = self.stream.read_buf(&mut self.buffer);
        let n = match limit {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| HttpError::ReadTimeout)??,
            None => read.await?,
        };

        if n == 0 {
            return Err(HttpError::ConnectionClosed);
        }
        Ok(())
    }
}

/// How a request is answered, decided from its protocol and method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    VersionNotSupported,
    Application,
    HeadersOnly,
    Options,
    NotAllowed,
}

impl Route {
    pub fn for_request(head: &RequestHead) -> Self {
        if head.protocol() != Some("HTTP/1.1") {
            return Route::VersionNotSupported;
        }
        match head.method_kind() {
            Some(Method::GET | Method::POST | Method::PUT | Method::DELETE) => Route::Application,
            Some(Method::HEAD) => Route::HeadersOnly,
            Some(Method::OPTIONS) => Route::Options,
            None => Route::NotAllowed,
        }
    }
}

/// Fills in the response for `session`, calling `app` when the route needs it.
pub fn dispatch<A>(app: &A, session: &mut Session) -> anyhow::Result<()>
where
    A: Application + ?Sized,
{
    match Route::for_request(&session.req_head) {
        Route::VersionNotSupported => session
            .resp_head
            .set_status_code(StatusCode::HttpVersionNotSupported),
        Route::Application => run_application(app, session)?,
        Route::HeadersOnly => {
            run_application(app, session)?;
            session.resp_body.clear();
        }
        Route::Options => session.resp_head.set("Allow", [ALLOWED_METHODS]),
        Route::NotAllowed => session
            .resp_head
            .set_status_code(StatusCode::MethodNotAllowed),
    }
    Ok(())
}

fn run_application<A>(app: &A, session: &mut Session) -> anyhow::Result<()>
where
    A: Application + ?Sized,
{
    app.handle(session)?;

    if session.resp_head.get("Content-Type").is_none_or(str::is_empty) {
        session.resp_head.set("Content-Type", [DEFAULT_CONTENT_TYPE]);
    }
    if session.resp_head.get("Location").is_some_and(|l| !l.is_empty()) {
        // reason phrase stays "OK" on redirects
        session.resp_head.set_status(301, "OK");
    }
    Ok(())
}

/// Sets `Content-Length` and, when the connection ends here,
/// `Connection: close`. Returns whether to keep the connection open.
pub fn finalize_response(
    session: &mut Session,
    keep_alive_times: usize,
    max_keep_alive: usize,
) -> bool {
    let close_requested = session
        .req_head
        .connection()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("close"));
    let keep_alive = !close_requested && keep_alive_times < max_keep_alive;

    if !keep_alive {
        session.resp_head.set("Connection", ["close"]);
    }
    session
        .resp_head
        .set("Content-Length", [session.resp_body.len().to_string()]);

    keep_alive
}
