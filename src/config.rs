use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_VAR: &str = "HOOKLET_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Pending-connection queue length handed to `listen(2)`.
    pub backlog: i32,
    /// Upper bound on readiness events fetched per wait.
    pub max_events: usize,
    /// Size of the scratch buffer each receive reads into.
    pub read_buffer_size: usize,
    /// How long a wait may block before the stop flag is re-checked.
    pub poll_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            backlog: 128,
            max_events: 64,
            read_buffer_size: 4096,
            poll_timeout_ms: 500,
        }
    }
}

impl Config {
    /// Defaults, then the file named by `HOOKLET_CONFIG`, then `HOST` / `PORT`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] but reads variables through `lookup`.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path, source })?;
                Self::from_yaml(&raw)?
            }
            None => Self::default(),
        };

        if let Some(host) = lookup("HOST") {
            cfg.host = host
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "HOST", value: host })?;
        }

        if let Some(port) = lookup("PORT") {
            cfg.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port })?;
        }

        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Config listening on every interface at `port`, everything else default.
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}
