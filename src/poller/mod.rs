//! Readiness multiplexer abstraction.
//!
//! The reactor talks to the kernel only through [`Multiplexer`]. One
//! implementation exists per notification facility and the concrete one is
//! chosen at compile time:
//!
//! - Linux / Android: `epoll`
//! - macOS / iOS / FreeBSD / OpenBSD / DragonFly: `kqueue`
//!
//! Every registration is edge-triggered, so whoever handles an event must
//! drain the descriptor until it reports "would block".

use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

use crate::error::InitError;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod epoll;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
mod kqueue;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub type Poller = epoll::EpollPoller;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
pub type Poller = kqueue::KqueuePoller;

/// A readiness notification for one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub fd: RawFd,
    /// The descriptor is the one passed to [`Multiplexer::register_listener`].
    pub is_listener: bool,
    /// Write readiness, as opposed to read readiness, hang-up or error.
    pub is_writable: bool,
}

/// Capability interface over a kernel readiness facility.
///
/// A descriptor is interested in read readiness or write readiness, never
/// both at once.
pub trait Multiplexer: Sized {
    /// Allocates the kernel object; `max_events` bounds each [`wait`](Self::wait).
    fn create(max_events: usize) -> Result<Self, InitError>;

    /// Registers the listening socket for read readiness and remembers it so
    /// its events come back with `is_listener` set.
    fn register_listener(&mut self, fd: RawFd) -> io::Result<()>;

    fn register_read(&self, fd: RawFd) -> io::Result<()>;

    /// Replaces read interest with write interest.
    fn switch_to_write(&self, fd: RawFd) -> io::Result<()>;

    fn deregister(&self, fd: RawFd) -> io::Result<()>;

    /// Blocks until at least one event is ready, a signal interrupts the
    /// call, or `timeout` elapses (`None` waits forever). `events` is cleared
    /// first and is left empty on interrupt or timeout.
    fn wait(&mut self, events: &mut Vec<Event>, timeout: Option<Duration>) -> io::Result<()>;
}
