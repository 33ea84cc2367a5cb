use crate::http::request::Request;
use crate::http::response::Response;

/// The pluggable request handler.
///
/// Called synchronously on the reactor thread once per connection; while it
/// runs no other connection is serviced. Any `FnMut(Request) -> Response`
/// closure is a handler.
pub trait Handler {
    fn handle(&mut self, request: Request) -> Response;
}

impl<F> Handler for F
where
    F: FnMut(Request) -> Response,
{
    fn handle(&mut self, request: Request) -> Response {
        self(request)
    }
}
