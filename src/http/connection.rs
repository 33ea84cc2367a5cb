use std::io::{self, Read, Write};

use bytes::BytesMut;
use tracing::{debug, info, warn};

use crate::handler::Handler;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::writer::{Flush, ResponseWriter};

pub enum ConnectionState {
    AwaitingRequest,
    AwaitingFlush(ResponseWriter),
    Closed,
}

/// What the reactor has to do with the connection after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep the current registration and wait for more readiness.
    Continue,
    /// A response is ready; move the registration from read to write.
    SwitchToWrite,
    /// Deregister, close and forget the connection.
    Close,
}

/// One accepted client: its stream plus the request/response buffers.
pub struct Connection<S> {
    stream: S,
    input: BytesMut,
    state: ConnectionState,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S) -> Self {
        Self::with_capacity(stream, 0)
    }

    /// Like [`new`](Self::new), reserving `capacity` bytes of input up front.
    /// The buffer still grows past it for larger requests.
    pub fn with_capacity(stream: S, capacity: usize) -> Self {
        Self {
            stream,
            input: BytesMut::with_capacity(capacity),
            state: ConnectionState::AwaitingRequest,
        }
    }

    /// Drains the socket into the input buffer and, once a full request is
    /// buffered, runs `handler` and stages the response.
    ///
    /// `scratch` must be non-empty. Readiness arriving after the response has
    /// been staged is ignored, so at most one request is ever served.
    pub fn on_readable<H>(&mut self, handler: &mut H, scratch: &mut [u8]) -> Step
    where
        H: Handler + ?Sized,
    {
        if !matches!(self.state, ConnectionState::AwaitingRequest) {
            return Step::Continue;
        }

        let mut eof = false;
        loop {
            match self.stream.read(scratch) {
                Ok(0) => {
                    eof = true;
                    break;
                }
                Ok(n) => self.input.extend_from_slice(&scratch[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!(error = %e, "receive failed");
                    return self.close();
                }
            }
        }

        match parse_http_request(&self.input) {
            Ok((request, _)) => {
                self.respond(handler, request);
                Step::SwitchToWrite
            }
            Err(ParseError::Incomplete) if eof => {
                debug!(buffered = self.input.len(), "peer closed before a full request");
                self.close()
            }
            Err(ParseError::Incomplete) => Step::Continue,
            Err(e) => {
                warn!(error = %e, "dropping malformed request");
                self.close()
            }
        }
    }

    /// Flushes as much of the staged response as the socket accepts.
    pub fn on_writable(&mut self) -> Step {
        let ConnectionState::AwaitingFlush(writer) = &mut self.state else {
            return Step::Continue;
        };

        match writer.write_to(&mut self.stream) {
            Ok(Flush::Complete) => self.close(),
            Ok(Flush::Blocked) => Step::Continue,
            Err(e) => {
                debug!(error = %e, "send failed");
                self.close()
            }
        }
    }

    fn respond<H>(&mut self, handler: &mut H, request: Request)
    where
        H: Handler + ?Sized,
    {
        let method = request.method.to_string();
        let path = request.path.clone();

        let response = handler.handle(request);
        info!(%method, %path, status = response.status, "request served");

        self.state = ConnectionState::AwaitingFlush(ResponseWriter::new(&response));
    }

    fn close(&mut self) -> Step {
        self.state = ConnectionState::Closed;
        Step::Close
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_awaiting_request(&self) -> bool {
        matches!(self.state, ConnectionState::AwaitingRequest)
    }

    pub fn is_awaiting_flush(&self) -> bool {
        matches!(self.state, ConnectionState::AwaitingFlush(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, ConnectionState::Closed)
    }

    /// Bytes received so far, including any that arrived after the request.
    pub fn buffered(&self) -> &[u8] {
        &self.input
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}
