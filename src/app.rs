//! The application side of the engine.

use crate::http::session::Session;

/// Produces response content for a request.
///
/// Called synchronously from the connection task, at most once per request,
/// for GET, POST, PUT, DELETE and HEAD. The handler reads `req_head` and
/// `req_body` and fills in `resp_head` and `resp_body`. An error is not
/// turned into a response; it ends the connection and is returned to
/// whoever drives it.
pub trait Application: Send + Sync + 'static {
    fn handle(&self, session: &mut Session) -> anyhow::Result<()>;
}

impl<F> Application for F
where
    F: Fn(&mut Session) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn handle(&self, session: &mut Session) -> anyhow::Result<()> {
        self(session)
    }
}
