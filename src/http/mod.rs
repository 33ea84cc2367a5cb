//! HTTP/1.1 request/response handling for a single connection.
//!
//! - **`connection`**: per-connection state machine and buffers
//! - **`parser`**: turns an accumulated byte buffer into a [`Request`](request::Request)
//! - **`request`**: request representation
//! - **`response`**: response representation with builder
//! - **`writer`**: serializes responses and flushes them to a non-blocking socket
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← accumulate bytes until a full request is buffered
//!        └──────┬───────────┘
//!               │ request parsed, handler called, response serialized
//!               ▼
//!        ┌──────────────────┐
//!        │  AwaitingFlush   │ ← drain output on write readiness
//!        └──────┬───────────┘
//!               │ last byte written, or EOF / I/O error from any state
//!               ▼
//!        ┌──────────────────┐
//!        │      Closed      │
//!        └──────────────────┘
//! ```
//!
//! There is no keep-alive: one request and one response per connection.

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
