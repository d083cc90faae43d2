use std::sync::Arc;

use fweb::app::Application;
use fweb::config::ConnectionConfig;
use fweb::http::connection::Connection;
use fweb::http::error::HttpError;
use fweb::http::session::Session;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use tokio::task::JoinHandle;

fn app<F>(f: F) -> Arc<F>
where
    F: Fn(&mut Session) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn pong() -> Arc<impl Application> {
    app(|s| {
        s.resp_body = b"pong".to_vec();
        Ok(())
    })
}

fn echo_body() -> Arc<impl Application> {
    app(|s| {
        s.resp_body = s.req_body.clone();
        Ok(())
    })
}

/// Runs a connection on one end of an in-memory pipe, returning the other end.
fn serve<A: Application>(
    app: Arc<A>,
    config: ConnectionConfig,
) -> (DuplexStream, JoinHandle<anyhow::Result<usize>>) {
    let (client, server) = duplex(64 * 1024);
    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server, app, config);
        conn.run().await.map(|_| conn.requests_served())
    });
    (client, handle)
}

/// Reads one response; `None` if the server closed first.
async fn read_response(client: &mut DuplexStream) -> Option<(String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = client.read(&mut chunk).await.unwrap();
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
    let len = head
        .lines()
        .find_map(|line| line.strip_prefix("Content-Length: "))
        .map(|v| v.parse::<usize>().unwrap())
        .unwrap_or(0);

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < len {
        let n = client.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed mid-body");
        body.extend_from_slice(&chunk[..n]);
    }
    Some((head, body))
}

#[tokio::test]
async fn test_ping_pong_wire_format() {
    let (mut client, handle) = serve(pong(), ConnectionConfig::default());

    client
        .write_all(b"GET /ping HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();

    assert!(out.starts_with(b"HTTP/1.1 200 OK\r\n"));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Content-Type: text/html; charset=utf-8\r\n"));
    assert!(text.contains("Content-Length: 4\r\n"));
    assert!(text.contains("Connection: close\r\n"));
    assert!(text.ends_with("\r\n\r\npong"));

    assert_eq!(handle.await.unwrap().unwrap(), 1);
}

#[tokio::test]
async fn test_keep_alive_serves_sequential_requests() {
    let (mut client, handle) = serve(pong(), ConnectionConfig::default());

    for _ in 0..3 {
        client
            .write_all(b"GET /ping HTTP/1.1\r\nHost: test\r\n\r\n")
            .await
            .unwrap();
        let (head, body) = read_response(&mut client).await.unwrap();
        assert!(head.starts_with("HTTP/1.1 200 OK"));
        assert!(!head.contains("Connection: close"));
        assert_eq!(body, b"pong".to_vec());
    }

    drop(client);
    assert_eq!(handle.await.unwrap().unwrap(), 3);
}

#[tokio::test]
async fn test_keep_alive_cap_closes_300th_response() {
    let (mut client, handle) = serve(pong(), ConnectionConfig::default());

    for i in 1..=300 {
        client
            .write_all(b"GET / HTTP/1.1\r\nHost: test\r\n\r\n")
            .await
            .unwrap();
        let (head, _) = read_response(&mut client).await.unwrap();
        assert_eq!(head.contains("Connection: close"), i == 300, "request {i}");
    }

    assert_eq!(handle.await.unwrap().unwrap(), 300);

    let mut rest = Vec::new();
    client.read_to_end(&mut rest).await.unwrap();
    assert!(rest.is_empty());
}

#[tokio::test]
async fn test_keep_alive_stays_open_below_cap() {
    let (mut client, handle) = serve(pong(), ConnectionConfig::default());

    for _ in 0..299 {
        client
            .write_all(b"GET / HTTP/1.1\r\nHost: test\r\n\r\n")
            .await
            .unwrap();
        let (head, _) = read_response(&mut client).await.unwrap();
        assert!(!head.contains("Connection: close"));
    }

    assert!(!handle.is_finished());
    drop(client);
    assert_eq!(handle.await.unwrap().unwrap(), 299);
}

#[tokio::test]
async fn test_body_split_across_reads() {
    let (mut client, handle) = serve(echo_body(), ConnectionConfig::default());

    client
        .write_all(b"POST /echo HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello")
        .await
        .unwrap();
    tokio::task::yield_now().await;
    client.write_all(b" world").await.unwrap();

    let (head, body) = read_response(&mut client).await.unwrap();
    assert!(head.contains("Content-Length: 11"));
    assert_eq!(body, b"hello world".to_vec());

    drop(client);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_back_to_back_requests_in_one_write() {
    let (mut client, handle) = serve(echo_body(), ConnectionConfig::default());

    client
        .write_all(
            b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\none\
POST / HTTP/1.1\r\nContent-Length: 3\r\nConnection: close\r\n\r\ntwo",
        )
        .await
        .unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.matches("HTTP/1.1 200 OK\r\n").count(), 2);
    assert!(text.contains("\r\n\r\noneHTTP/1.1 200 OK\r\n"));
    assert!(text.ends_with("\r\n\r\ntwo"));
    assert_eq!(handle.await.unwrap().unwrap(), 2);
}

#[tokio::test]
async fn test_head_request_sends_no_body() {
    let (mut client, handle) = serve(pong(), ConnectionConfig::default());

    client
        .write_all(b"HEAD / HTTP/1.1\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Content-Length: 0\r\n"));
    assert!(text.ends_with("\r\n\r\n"));
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unsupported_protocol_over_the_wire() {
    let (mut client, handle) = serve(pong(), ConnectionConfig::default());

    client
        .write_all(b"GET / HTTP/1.0\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("HTTP/1.1 505 HTTP Version Not Supported\r\n"));
    assert!(text.contains("Content-Length: 0\r\n"));
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_close_mid_head_sends_nothing() {
    let (mut client, handle) = serve(pong(), ConnectionConfig::default());

    client.write_all(b"GET / HTTP/1.1\r\nHost: te").await.unwrap();
    client.shutdown().await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();

    assert!(out.is_empty());
    assert_eq!(handle.await.unwrap().unwrap(), 0);
}

#[tokio::test]
async fn test_close_mid_body_sends_nothing() {
    let (mut client, handle) = serve(echo_body(), ConnectionConfig::default());

    client
        .write_all(b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc")
        .await
        .unwrap();
    client.shutdown().await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();

    assert!(out.is_empty());
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_invalid_content_length_ends_connection() {
    let (mut client, handle) = serve(pong(), ConnectionConfig::default());

    client
        .write_all(b"POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n")
        .await
        .unwrap();

    let err = handle.await.unwrap().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<HttpError>(),
        Some(HttpError::InvalidContentLength(_))
    ));

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_malformed_request_line_ends_connection() {
    let (mut client, handle) = serve(pong(), ConnectionConfig::default());

    client.write_all(b"GET /\r\n\r\n").await.unwrap();

    let err = handle.await.unwrap().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<HttpError>(),
        Some(HttpError::MalformedRequestLine(_))
    ));

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_application_error_ends_connection() {
    let failing = app(|_| anyhow::bail!("handler failed"));
    let (mut client, handle) = serve(failing, ConnectionConfig::default());

    client
        .write_all(b"GET / HTTP/1.1\r\n\r\n")
        .await
        .unwrap();

    let err = handle.await.unwrap().unwrap_err();
    assert_eq!(err.to_string(), "handler failed");

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_read_timeout() {
    let config = ConnectionConfig {
        read_timeout_secs: Some(1),
        ..ConnectionConfig::default()
    };
    let (_client, handle) = serve(pong(), config);

    let err = handle.await.unwrap().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<HttpError>(),
        Some(HttpError::ReadTimeout)
    ));
}

#[tokio::test]
async fn test_small_read_buffer_still_frames_requests() {
    let config = ConnectionConfig {
        read_buffer_size: 1,
        ..ConnectionConfig::default()
    };
    let (mut client, handle) = serve(echo_body(), config);

    client
        .write_all(b"PUT /x HTTP/1.1\r\nContent-Length: 4\r\nConnection: close\r\n\r\ndata")
        .await
        .unwrap();

    let (head, body) = read_response(&mut client).await.unwrap();
    assert!(head.contains("Connection: close"));
    assert_eq!(body, b"data".to_vec());
    assert_eq!(handle.await.unwrap().unwrap(), 1);
}
