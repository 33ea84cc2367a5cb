use hooklet::http::parser::{ParseError, find_headers_end, parse_http_request};
use hooklet::http::request::{Method, RequestBuilder};

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert!(parsed.body.is_empty());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_post_request_with_body() {
    let req = b"POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.path, "/api");
    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_content_length_truncates_extra_bytes() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 3\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, b"hel".to_vec());
    assert_eq!(consumed, req.len() - 2);
}

#[test]
fn test_parse_without_content_length_takes_remaining_bytes() {
    let req = b"POST /hook HTTP/1.1\r\nHost: x\r\n\r\n{\"a\":1}";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, b"{\"a\":1}".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_content_length_lookup_ignores_case() {
    let req = b"POST /api HTTP/1.1\r\ncontent-length: 2\r\n\r\nokay";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, b"ok".to_vec());
}

#[test]
fn test_parse_multiple_headers() {
    let req = b"GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.len(), 3);
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert_eq!(parsed.headers.get("User-Agent").unwrap(), "test-client");
    assert_eq!(parsed.headers.get("Accept").unwrap(), "*/*");
}

#[test]
fn test_parse_header_key_whitespace_is_stripped() {
    let req = b"GET / HTTP/1.1\r\n  X-Sig nature \t:   abc def  \r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("X-Signature").unwrap(), "abc def");
}

#[test]
fn test_parse_header_value_keeps_later_colons() {
    let req = b"GET / HTTP/1.1\r\nHost: localhost:8080\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), "localhost:8080");
}

#[test]
fn test_parse_repeated_header_keeps_last_value() {
    let req = b"GET / HTTP/1.1\r\nX-Tag: one\r\nX-Tag: two\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("X-Tag").unwrap(), "two");
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let req = b"GET /search?q=rust HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/search?q=rust");
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_incomplete_request_partial_body() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_invalid_content_length() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: ten\r\n\r\nhello";
    let result = parse_http_request(req);

    assert_eq!(result, Err(ParseError::InvalidContentLength("ten".to_string())));
}

#[test]
fn test_parse_unknown_method_is_kept() {
    let req = b"PURGE /cache HTTP/1.1\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::Extension("PURGE".to_string()));
    assert_eq!(parsed.method.as_str(), "PURGE");
}

#[test]
fn test_parse_short_request_line_leaves_fields_empty() {
    let (parsed, _) = parse_http_request(b"GET\r\nHost: x\r\n\r\n").unwrap();
    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "");

    let (parsed, _) = parse_http_request(b"\r\n\r\n").unwrap();
    assert_eq!(parsed.method, Method::Extension(String::new()));
    assert_eq!(parsed.path, "");
    assert!(parsed.headers.is_empty());
}

#[test]
fn test_parse_header_without_colon_is_skipped() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\nHost: x\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.headers.get("Host").unwrap(), "x");
}

#[test]
fn test_parse_various_http_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} / HTTP/1.1\r\n\r\n", method_str);
        let (parsed, _) = parse_http_request(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, expected_method);
    }
}

#[test]
fn test_parse_request_with_binary_body() {
    let req = b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\n\x00\x01\x02\x03";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, vec![0, 1, 2, 3]);
}

#[test]
fn test_parse_body_may_contain_terminator() {
    let req = b"POST / HTTP/1.1\r\nContent-Length: 6\r\n\r\na\r\n\r\nb";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, b"a\r\n\r\nb".to_vec());
}

#[test]
fn test_parse_round_trips_client_rendering() {
    let original = RequestBuilder::new(Method::PUT, "/hooks/7?dry=1")
        .header("Host", "bot.internal")
        .header("Content-Type", "application/json")
        .header("Content-Length", "13")
        .body(r#"{"id": "abc"}"#)
        .build();

    let bytes = original.to_bytes();
    let (parsed, consumed) = parse_http_request(&bytes).unwrap();

    assert_eq!(parsed, original);
    assert_eq!(consumed, bytes.len());
}

#[test]
fn test_find_headers_end() {
    assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\n\r\n"), Some(14));
    assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\n"), None);
    assert_eq!(find_headers_end(b""), None);
}
