//! The reactor: listener, connection table and the event loop tying them to
//! the multiplexer.

pub mod listener;
pub mod reactor;
pub mod table;

pub use reactor::{Server, StopHandle};
