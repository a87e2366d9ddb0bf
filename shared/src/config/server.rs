//! HTTP listener settings

use serde::{Deserialize, Serialize};

use super::{env_or, env_string};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Actix worker count; 0 keeps the Actix default of one per core
    #[serde(default)]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            workers: 0,
        }
    }

    /// Read `SERVER_HOST`, `SERVER_PORT` and `SERVER_WORKERS`
    pub fn from_env() -> Self {
        Self {
            host: env_string("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env_or("SERVER_PORT", DEFAULT_PORT),
            workers: env_or("SERVER_WORKERS", 0),
        }
    }

    /// `host:port` for `HttpServer::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::new("0.0.0.0", 3000);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(ServerConfig::default().bind_address(), "127.0.0.1:8080");
    }
}
