use fweb::http::response::{ResponseHead, StatusCode};
use fweb::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::MovedPermanently.as_u16(), 301);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
    assert_eq!(
        StatusCode::HttpVersionNotSupported.reason_phrase(),
        "HTTP Version Not Supported"
    );
}

#[test]
fn test_default_status_is_200_ok() {
    let head = ResponseHead::new();

    assert_eq!(head.resp_code, 200);
    assert_eq!(head.resp_msg, "OK");
    assert_eq!(head.dump(), "HTTP/1.1 200 OK\r\n");
}

#[test]
fn test_dump_status_line_then_headers() {
    let mut head = ResponseHead::new();
    head.add("Content-Type", "text/html");

    assert_eq!(head.dump(), "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n");
}

#[test]
fn test_dump_skips_pseudo_headers() {
    let mut head = ResponseHead::new();
    head.add("Method", "GET");
    head.add("DIR", "/x");
    head.add("protocol", "HTTP/1.1");
    head.add("First-Line", "GET /x HTTP/1.1");
    head.add("X-Real", "1");

    let dump = head.dump();
    assert_eq!(dump, "HTTP/1.1 200 OK\r\nX-Real: 1\r\n");
    assert!(!dump.to_ascii_lowercase().contains("method"));
}

#[test]
fn test_dump_one_line_per_value() {
    let mut head = ResponseHead::new();
    head.add("Set-Cookie", "a=1");
    head.add("set-cookie", "b=2");

    assert_eq!(
        head.dump(),
        "HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n"
    );
}

#[test]
fn test_set_status_code() {
    let mut head = ResponseHead::new();
    head.set_status_code(StatusCode::NotFound);

    assert!(head.dump().starts_with("HTTP/1.1 404 Not Found\r\n"));

    head.set_status(418, "I'm a teapot");
    assert!(head.dump().starts_with("HTTP/1.1 418 I'm a teapot\r\n"));
}

#[test]
fn test_serialize_response_appends_blank_line_and_body() {
    let mut head = ResponseHead::new();
    head.set("Content-Length", ["5"]);

    let bytes = serialize_response(&head, b"hello");
    assert_eq!(bytes, b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello".to_vec());
}
