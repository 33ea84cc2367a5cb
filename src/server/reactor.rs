use std::io;
use std::mem;
use std::net::SocketAddr;
use std::os::fd::{AsRawFd, RawFd};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::StartupError;
use crate::handler::Handler;
use crate::http::connection::{Connection, Step};
use crate::poller::{Event, Multiplexer, Poller};
use crate::server::listener::Listener;
use crate::server::table::ConnectionTable;
use crate::sys::Socket;

/// Cooperative stop flag for a [`Server`] running on another thread.
///
/// The reactor checks it once per wait cycle, so a stop takes effect within
/// one poll timeout.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Single-threaded webhook server: one listener, one multiplexer, one
/// request/response exchange per accepted connection.
pub struct Server<H> {
    listener: Listener,
    poller: Poller,
    connections: ConnectionTable<Socket>,
    handler: H,
    running: Arc<AtomicBool>,
    events: Vec<Event>,
    scratch: Vec<u8>,
    poll_timeout: Duration,
}

impl<H: Handler> Server<H> {
    /// Listens on every interface at `port` with default settings.
    pub fn bind(port: u16, handler: H) -> Result<Self, StartupError> {
        Self::with_config(&Config::with_port(port), handler)
    }

    pub fn with_config(config: &Config, handler: H) -> Result<Self, StartupError> {
        let listener = Listener::bind(config.listen_addr(), config.backlog)?;

        let mut poller = Poller::create(config.max_events)?;
        poller
            .register_listener(listener.as_raw_fd())
            .map_err(StartupError::Register)?;

        Ok(Self {
            listener,
            poller,
            connections: ConnectionTable::new(),
            handler,
            running: Arc::new(AtomicBool::new(true)),
            events: Vec::with_capacity(config.max_events),
            scratch: vec![0; config.read_buffer_size.max(1)],
            poll_timeout: config.poll_timeout(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.running.clone())
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Number of connections accepted and not yet torn down.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Runs the event loop until [`stop`](Self::stop) is requested.
    ///
    /// Only a failing kernel wait ends the loop with an error; every
    /// per-connection failure is handled by closing that connection.
    pub fn start(&mut self) -> io::Result<()> {
        info!(addr = %self.local_addr(), "reactor started");

        while self.running.load(Ordering::SeqCst) {
            let mut events = mem::take(&mut self.events);
            let waited = self.poller.wait(&mut events, Some(self.poll_timeout));

            if let Err(e) = waited {
                self.events = events;
                return Err(e);
            }

            for event in &events {
                self.dispatch(*event);
            }
            self.events = events;
        }

        info!(open = self.connections.len(), "reactor stopped");
        Ok(())
    }

    fn dispatch(&mut self, event: Event) {
        if event.is_listener {
            self.accept_connections();
            return;
        }

        let Some(conn) = self.connections.get_mut(event.fd) else {
            debug!(fd = event.fd, "event for unknown descriptor");
            return;
        };

        let step = if event.is_writable || conn.is_awaiting_flush() {
            conn.on_writable()
        } else {
            conn.on_readable(&mut self.handler, &mut self.scratch)
        };

        match step {
            Step::Continue => {}
            Step::SwitchToWrite => {
                if let Err(e) = self.poller.switch_to_write(event.fd) {
                    warn!(fd = event.fd, error = %e, "failed to switch connection to write");
                    self.close_connection(event.fd);
                }
            }
            Step::Close => self.close_connection(event.fd),
        }
    }

    fn accept_connections(&mut self) {
        for (socket, peer) in self.listener.accept_pending() {
            let fd = socket.as_raw_fd();

            if let Err(e) = self.poller.register_read(fd) {
                // Dropping the socket closes it; nothing else refers to it yet.
                warn!(fd, %peer, error = %e, "failed to register connection");
                continue;
            }

            // A tracked entry owns its descriptor, so the kernel cannot hand
            // the same number out again until that entry is closed.
            debug_assert!(!self.connections.contains(fd), "fd {fd} already tracked");
            let conn = Connection::with_capacity(socket, self.scratch.len());
            self.connections.insert(fd, conn);
            debug!(fd, %peer, "connection accepted");
        }
    }

    fn close_connection(&mut self, fd: RawFd) {
        let Some(conn) = self.connections.remove(fd) else {
            return;
        };

        if let Err(e) = self.poller.deregister(fd) {
            warn!(fd, error = %e, "failed to deregister connection");
        }
        drop(conn);

        debug!(fd, open = self.connections.len(), "connection closed");
    }
}

impl<H> Drop for Server<H> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        debug!(open = self.connections.len(), "server dropped");
    }
}
