use std::net::{AddrParseError, IpAddr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--host must be an IP address or 'localhost': {source}")]
    InvalidHost { source: AddrParseError },
    #[error("--history-limit must be > 0")]
    InvalidHistoryLimit,
}

/// Settings for `serve`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub history_limit: usize,
}

impl ServerConfig {
    pub fn new(host: String, port: u16, history_limit: usize) -> Result<Self, ConfigError> {
        if history_limit == 0 {
            return Err(ConfigError::InvalidHistoryLimit);
        }
        let config = Self {
            host,
            port,
            history_limit,
        };
        config.socket_addr()?;
        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}
