use std::collections::HashMap;
use std::os::fd::RawFd;

use crate::http::connection::Connection;

/// Live connections keyed by descriptor. Owned by the reactor thread alone.
pub struct ConnectionTable<S> {
    entries: HashMap<RawFd, Connection<S>>,
}

impl<S> Default for ConnectionTable<S> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<S> ConnectionTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a fresh connection, returning whatever was stored under `fd`
    /// before (a descriptor number the kernel has recycled).
    pub fn insert(&mut self, fd: RawFd, conn: Connection<S>) -> Option<Connection<S>> {
        self.entries.insert(fd, conn)
    }

    pub fn get_mut(&mut self, fd: RawFd) -> Option<&mut Connection<S>> {
        self.entries.get_mut(&fd)
    }

    pub fn remove(&mut self, fd: RawFd) -> Option<Connection<S>> {
        self.entries.remove(&fd)
    }

    pub fn contains(&self, fd: RawFd) -> bool {
        self.entries.contains_key(&fd)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
