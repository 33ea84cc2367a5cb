//! Linux `epoll` backend.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::time::Duration;

use libc::{
    EPOLL_CLOEXEC, EPOLL_CTL_ADD, EPOLL_CTL_DEL, EPOLL_CTL_MOD, EPOLLET, EPOLLIN, EPOLLOUT,
    EPOLLRDHUP, c_int, epoll_create1, epoll_ctl, epoll_event, epoll_wait,
};

use super::{Event, Multiplexer};
use crate::error::InitError;

pub struct EpollPoller {
    epoll: OwnedFd,
    listener: Option<RawFd>,
    /// Kernel-filled buffer; its capacity is the per-wait event limit.
    events: Vec<epoll_event>,
}

impl EpollPoller {
    fn ctl(&self, op: c_int, fd: RawFd, flags: c_int) -> io::Result<()> {
        // The data word carries the descriptor itself.
        let mut event = epoll_event {
            events: flags as u32,
            u64: fd as u64,
        };

        let rc = unsafe { epoll_ctl(self.epoll.as_raw_fd(), op, fd, &mut event) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Multiplexer for EpollPoller {
    fn create(max_events: usize) -> Result<Self, InitError> {
        let fd = unsafe { epoll_create1(EPOLL_CLOEXEC) };
        if fd < 0 {
            return Err(InitError {
                backend: "epoll",
                source: io::Error::last_os_error(),
            });
        }

        Ok(Self {
            epoll: unsafe { OwnedFd::from_raw_fd(fd) },
            listener: None,
            events: Vec::with_capacity(max_events.max(1)),
        })
    }

    fn register_listener(&mut self, fd: RawFd) -> io::Result<()> {
        self.ctl(EPOLL_CTL_ADD, fd, EPOLLIN | EPOLLET)?;
        self.listener = Some(fd);
        Ok(())
    }

    fn register_read(&self, fd: RawFd) -> io::Result<()> {
        self.ctl(EPOLL_CTL_ADD, fd, EPOLLIN | EPOLLRDHUP | EPOLLET)
    }

    fn switch_to_write(&self, fd: RawFd) -> io::Result<()> {
        self.ctl(EPOLL_CTL_MOD, fd, EPOLLOUT | EPOLLRDHUP | EPOLLET)
    }

    fn deregister(&self, fd: RawFd) -> io::Result<()> {
        self.ctl(EPOLL_CTL_DEL, fd, 0)
    }

    fn wait(&mut self, events: &mut Vec<Event>, timeout: Option<Duration>) -> io::Result<()> {
        events.clear();

        // Round sub-millisecond timeouts up so they never turn into a busy poll.
        let timeout_ms = timeout
            .map(|t| t.as_micros().div_ceil(1000).min(c_int::MAX as u128) as c_int)
            .unwrap_or(-1);

        self.events.clear();
        let n = unsafe {
            epoll_wait(
                self.epoll.as_raw_fd(),
                self.events.as_mut_ptr(),
                self.events.capacity() as c_int,
                timeout_ms,
            )
        };

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(());
            }
            return Err(err);
        }

        unsafe {
            self.events.set_len(n as usize);
        }

        for ev in &self.events {
            // epoll_event is packed on some targets; copy fields out before use.
            let flags = ev.events;
            let fd = ev.u64 as RawFd;

            events.push(Event {
                fd,
                is_listener: self.listener == Some(fd),
                is_writable: flags & EPOLLOUT as u32 != 0,
            });
        }

        Ok(())
    }
}
