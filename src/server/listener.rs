use std::io;
use std::net::SocketAddr;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use tracing::{info, warn};

use crate::error::StartupError;
use crate::sys::{self, Socket};

/// The bound, non-blocking listening socket.
pub struct Listener {
    fd: OwnedFd,
    local_addr: SocketAddr,
}

impl Listener {
    /// Binds `addr` with `SO_REUSEADDR` and starts listening with `backlog`.
    pub fn bind(addr: SocketAddr, backlog: i32) -> Result<Self, StartupError> {
        let fd = sys::stream_socket(&addr).map_err(StartupError::Socket)?;
        let raw = fd.as_raw_fd();

        sys::set_reuseaddr(raw).map_err(StartupError::Socket)?;
        sys::set_nonblocking(raw).map_err(StartupError::Socket)?;
        sys::bind(raw, &addr).map_err(|source| StartupError::Bind { addr, source })?;
        sys::listen(raw, backlog).map_err(|source| StartupError::Listen { addr, source })?;

        let local_addr = sys::local_addr(raw).map_err(StartupError::LocalAddr)?;
        info!(addr = %local_addr, backlog, "listening");

        Ok(Self { fd, local_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts every connection currently queued, stopping at "would block".
    ///
    /// Interrupted and aborted accepts are retried; any other error ends
    /// this drain and is only logged.
    pub fn accept_pending(&self) -> Vec<(Socket, SocketAddr)> {
        let mut accepted = Vec::new();

        loop {
            match sys::accept(self.fd.as_raw_fd()) {
                Ok(conn) => accepted.push(conn),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::Interrupted | io::ErrorKind::ConnectionAborted
                    ) =>
                {
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    break;
                }
            }
        }

        accepted
    }
}

impl AsRawFd for Listener {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}
