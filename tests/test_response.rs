use hooklet::http::response::{Response, ResponseBuilder};
use hooklet::http::writer::serialize_response;

fn header_lines(wire: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(wire);
    let head = text.split("\r\n\r\n").next().unwrap();
    head.split("\r\n").skip(1).map(str::to_string).collect()
}

#[test]
fn test_response_default_status_is_200() {
    let response = Response::default();

    assert_eq!(response.status, 200);
    assert!(response.headers.is_empty());
    assert!(response.body.is_empty());
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(200)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body("test")
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(response.headers.get("X-Custom").unwrap(), "value");
    assert_eq!(response.body, b"test".to_vec());
}

#[test]
fn test_response_builder_does_not_add_content_length() {
    let response = ResponseBuilder::new(200).body("abc").build();

    assert!(!response.headers.contains_key("Content-Length"));
}

#[test]
fn test_response_helpers() {
    assert_eq!(Response::ok("x").status, 200);
    assert_eq!(Response::text("ok").headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(Response::bad_request("nope").status, 400);
    assert_eq!(Response::not_found().body, b"404 Not Found".to_vec());
    assert_eq!(Response::internal_error().status, 500);
}

#[test]
fn test_serialize_health_response_exactly() {
    let response = Response::text("ok");

    assert_eq!(
        serialize_response(&response),
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n\r\nok".to_vec()
    );
}

#[test]
fn test_serialize_always_says_ok() {
    let wire = serialize_response(&ResponseBuilder::new(404).body("missing").build());
    assert!(wire.starts_with(b"HTTP/1.1 404 OK\r\n"));

    let wire = serialize_response(&ResponseBuilder::new(500).build());
    assert!(wire.starts_with(b"HTTP/1.1 500 OK\r\n"));
}

#[test]
fn test_serialize_injects_content_length_matching_body() {
    for body in [Vec::new(), b"x".to_vec(), vec![0u8; 1000], "héllo".as_bytes().to_vec()] {
        let len = body.len();
        let wire = serialize_response(&ResponseBuilder::new(200).body(body.clone()).build());

        assert_eq!(header_lines(&wire), vec![format!("Content-Length: {len}")]);
        assert!(wire.ends_with(&body));
    }
}

#[test]
fn test_serialize_keeps_caller_content_length() {
    let response = ResponseBuilder::new(200)
        .header("Content-Length", "999")
        .body("test")
        .build();

    let wire = serialize_response(&response);

    assert_eq!(header_lines(&wire), vec!["Content-Length: 999".to_string()]);
}

#[test]
fn test_serialize_caller_content_length_in_any_case() {
    let response = ResponseBuilder::new(200)
        .header("content-length", "4")
        .body("test")
        .build();

    let wire = serialize_response(&response);

    assert_eq!(header_lines(&wire), vec!["content-length: 4".to_string()]);
}

#[test]
fn test_serialize_emits_every_header() {
    let response = ResponseBuilder::new(201)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .header("X-Frame-Options", "DENY")
        .body("{}")
        .build();

    let mut lines = header_lines(&serialize_response(&response));
    lines.sort();

    assert_eq!(
        lines,
        vec![
            "Cache-Control: no-cache",
            "Content-Length: 2",
            "Content-Type: application/json",
            "X-Frame-Options: DENY",
        ]
    );
}

#[test]
fn test_serialize_is_idempotent() {
    let response = ResponseBuilder::new(202)
        .header("A", "1")
        .header("B", "2")
        .header("C", "3")
        .body("payload")
        .build();

    assert_eq!(serialize_response(&response), serialize_response(&response));
}
