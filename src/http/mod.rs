//! HTTP protocol implementation.
//!
//! A hand-rolled HTTP/1.1 engine with keep-alive connections and
//! case-insensitive, multi-valued headers.
//!
//! # Architecture
//!
//! - **`headers`**: case-insensitive, order-preserving multi-valued header map
//! - **`quality`**: weighted header grammar (`Accept: text/html;q=0.9, ...`)
//! - **`params`**: `; `-separated compound values (`Content-Type`)
//! - **`request`**: request line + headers with derived typed views
//! - **`response`**: status line + headers, serialized with `dump`
//! - **`session`**: one request/response exchange handed to the application
//! - **`multipart`**: `multipart/form-data` body parts
//! - **`parser`**: locating the end of a request head in the read buffer
//! - **`writer`**: serializes and writes responses to the client
//! - **`connection`**: the per-connection state machine and dispatch
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌───────────────┐
//!        │ AwaitingHead  │ ← Read until \r\n\r\n
//!        └──────┬────────┘
//!               │ Head parsed (Content-Length present?)
//!               ├──────────────► AwaitingBody ← Read Content-Length bytes
//!               ▼                     │
//!        ┌───────────────┐            │
//!        │  Dispatching  │ ◄──────────┘  Route on protocol/method
//!        └──────┬────────┘
//!               │ Response finalized
//!               ▼
//!        ┌───────────────┐
//!        │    Writing    │ ← Send head + body in one buffer
//!        └──────┬────────┘
//!               ├─ Keep-Alive → AwaitingHead (same connection)
//!               └─ Close → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fweb::config::ConnectionConfig;
//! use fweb::http::connection::Connection;
//! use fweb::http::session::Session;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let app = Arc::new(|s: &mut Session| -> anyhow::Result<()> {
//!         s.echo("pong");
//!         Ok(())
//!     });
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let app = app.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, app, ConnectionConfig::default());
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod error;
pub mod headers;
pub mod multipart;
pub mod params;
pub mod parser;
pub mod quality;
pub mod request;
pub mod response;
pub mod session;
pub mod writer;

pub use error::{HeaderParseError, HttpError};
pub use headers::HeaderMap;
pub use request::RequestHead;
pub use response::ResponseHead;
pub use session::Session;
