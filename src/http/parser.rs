use crate::http::request::{Method, Request, find_header};
use std::collections::HashMap;

use thiserror::Error;

pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// More bytes are needed: no header terminator yet, or the body is
    /// shorter than its declared `Content-Length`.
    #[error("request is incomplete")]
    Incomplete,
    #[error("invalid Content-Length {0:?}")]
    InvalidContentLength(String),
}

/// Parses one request from the front of `buf`.
///
/// Returns the request and the number of bytes it spans. Parsing is lenient:
/// a short request line leaves `method`/`path` empty and header lines without
/// a colon are skipped. Without `Content-Length` the rest of `buf` is the body.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let head = String::from_utf8_lossy(&buf[..headers_end]);
    let body_bytes = &buf[headers_end + HEADER_TERMINATOR.len()..];

    let mut lines = head.split("\r\n");

    // Request line; the protocol version and anything after it is dropped
    let mut parts = lines.next().unwrap_or_default().split_whitespace();
    let method = Method::from_token(parts.next().unwrap_or_default());
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key: String = key.chars().filter(|c| !c.is_whitespace()).collect();
        headers.insert(key, value.trim().to_string());
    }

    let body_len = match find_header(&headers, "Content-Length") {
        Some(raw) => {
            let declared = raw
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength(raw.to_string()))?;
            if body_bytes.len() < declared {
                return Err(ParseError::Incomplete);
            }
            declared
        }
        None => body_bytes.len(),
    };

    let request = Request {
        method,
        path,
        headers,
        body: body_bytes[..body_len].to_vec(),
    };

    Ok((request, headers_end + HEADER_TERMINATOR.len() + body_len))
}

/// Offset of the first `\r\n\r\n` in `buf`.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}
