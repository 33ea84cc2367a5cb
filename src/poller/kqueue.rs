//! BSD / macOS `kqueue` backend.
//!
//! kqueue tracks read and write interest as separate filters, so switching a
//! descriptor to write means deleting its read filter and adding a write one
//! in the same change list.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::time::Duration;
use std::{mem, ptr};

use libc::{EV_ADD, EV_CLEAR, EV_DELETE, EVFILT_READ, EVFILT_WRITE, c_int, kevent, kqueue, timespec};

use super::{Event, Multiplexer};
use crate::error::InitError;

pub struct KqueuePoller {
    kq: OwnedFd,
    listener: Option<RawFd>,
    events: Vec<kevent>,
}

// `kevent` carries a raw `udata` pointer that is never set or dereferenced.
unsafe impl Send for KqueuePoller {}

fn change(fd: RawFd, filter: i16, flags: u16) -> kevent {
    let mut ev: kevent = unsafe { mem::zeroed() };
    ev.ident = fd as _;
    ev.filter = filter as _;
    ev.flags = flags as _;
    ev
}

impl KqueuePoller {
    fn apply(&self, changes: &[kevent]) -> io::Result<()> {
        let rc = unsafe {
            kevent(
                self.kq.as_raw_fd(),
                changes.as_ptr(),
                changes.len() as c_int,
                ptr::null_mut(),
                0,
                ptr::null(),
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Multiplexer for KqueuePoller {
    fn create(max_events: usize) -> Result<Self, InitError> {
        let fd = unsafe { kqueue() };
        if fd < 0 {
            return Err(InitError {
                backend: "kqueue",
                source: io::Error::last_os_error(),
            });
        }

        let kq = unsafe { OwnedFd::from_raw_fd(fd) };
        crate::sys::set_cloexec(kq.as_raw_fd()).map_err(|source| InitError {
            backend: "kqueue",
            source,
        })?;

        Ok(Self {
            kq,
            listener: None,
            events: Vec::with_capacity(max_events.max(1)),
        })
    }

    fn register_listener(&mut self, fd: RawFd) -> io::Result<()> {
        self.register_read(fd)?;
        self.listener = Some(fd);
        Ok(())
    }

    fn register_read(&self, fd: RawFd) -> io::Result<()> {
        self.apply(&[change(fd, EVFILT_READ, EV_ADD | EV_CLEAR)])
    }

    fn switch_to_write(&self, fd: RawFd) -> io::Result<()> {
        self.apply(&[
            change(fd, EVFILT_READ, EV_DELETE),
            change(fd, EVFILT_WRITE, EV_ADD | EV_CLEAR),
        ])
    }

    fn deregister(&self, fd: RawFd) -> io::Result<()> {
        // Only one of the two filters is live at a time.
        for filter in [EVFILT_READ, EVFILT_WRITE] {
            match self.apply(&[change(fd, filter, EV_DELETE)]) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
                _ => {}
            }
        }
        Ok(())
    }

    fn wait(&mut self, events: &mut Vec<Event>, timeout: Option<Duration>) -> io::Result<()> {
        events.clear();

        let ts = timeout.map(|t| timespec {
            tv_sec: t.as_secs() as _,
            tv_nsec: t.subsec_nanos() as _,
        });
        let ts_ptr = ts.as_ref().map_or(ptr::null(), |t| t as *const timespec);

        self.events.clear();
        let n = unsafe {
            kevent(
                self.kq.as_raw_fd(),
                ptr::null(),
                0,
                self.events.as_mut_ptr(),
                self.events.capacity() as c_int,
                ts_ptr,
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
            let fd = ev.ident as RawFd;
            events.push(Event {
                fd,
                is_listener: self.listener == Some(fd),
                is_writable: ev.filter == EVFILT_WRITE,
            });
        }

        Ok(())
    }
}
