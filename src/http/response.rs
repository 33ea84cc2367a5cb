use std::collections::HashMap;

/// A handler's answer. Whatever it carries is written to the wire as-is,
/// apart from a `Content-Length` the serializer adds when it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Numeric status; the status line always reads `OK` after it.
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use hooklet::http::response::ResponseBuilder;
/// let response = ResponseBuilder::new(201)
///     .header("Content-Type", "application/json")
///     .body("{}")
///     .build();
/// assert_eq!(response.status, 201);
/// ```
pub struct ResponseBuilder {
    status: u16,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a simple 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(200).body(body).build()
    }

    /// 200 with a `text/plain` content type.
    pub fn text(body: impl Into<String>) -> Self {
        ResponseBuilder::new(200)
            .header("Content-Type", "text/plain")
            .body(body.into())
            .build()
    }

    pub fn bad_request(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(400).body(body).build()
    }

    pub fn not_found() -> Self {
        ResponseBuilder::new(404).body("404 Not Found").build()
    }

    pub fn internal_error() -> Self {
        ResponseBuilder::new(500).body("500 Internal Server Error").build()
    }
}
