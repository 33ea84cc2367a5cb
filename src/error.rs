use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// The kernel readiness facility could not be allocated.
#[derive(Error, Debug)]
#[error("failed to create {backend} instance: {source}")]
pub struct InitError {
    pub backend: &'static str,
    #[source]
    pub source: io::Error,
}

/// Failures that keep the server from ever entering its event loop.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("failed to create listening socket: {0}")]
    Socket(#[source] io::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to listen on {addr}: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to read bound address: {0}")]
    LocalAddr(#[source] io::Error),
    #[error("failed to register listener with the multiplexer: {0}")]
    Register(#[source] io::Error),
    #[error(transparent)]
    Multiplexer(#[from] InitError),
}

/// Configuration could not be assembled.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
