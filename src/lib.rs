//! Hooklet - single-threaded webhook HTTP server
//!
//! A minimal HTTP/1.1 server driven directly by epoll (Linux) or kqueue
//! (macOS/BSD) readiness. One request and one response per connection; the
//! request handler runs synchronously on the reactor thread.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod poller;
pub mod server;
pub mod sys;

pub use config::Config;
pub use error::{ConfigError, InitError, StartupError};
pub use handler::Handler;
pub use http::request::{Method, Request};
pub use http::response::{Response, ResponseBuilder};
pub use server::{Server, StopHandle};
