//! Environment-driven API configuration.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "PODFORGE_BIND_ADDR";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var} '{value}': {source}")]
    InvalidBindAddr {
        var: &'static str,
        value: String,
        #[source]
        source: AddrParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
}

impl ApiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup` (unset variables return `None`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = lookup(BIND_ADDR_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::debug!("{BIND_ADDR_VAR} not set; using {DEFAULT_BIND_ADDR}");
                DEFAULT_BIND_ADDR.to_string()
            });

        let bind_addr = value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: value.clone(),
                source,
            })?;

        Ok(Self { bind_addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
    }

    #[test]
    fn reads_bind_addr() {
        let config = ApiConfig::from_lookup(|_| Some("127.0.0.1:9000".to_string())).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn rejects_malformed_bind_addr() {
        let err = ApiConfig::from_lookup(|_| Some("localhost".to_string())).unwrap_err();
        assert!(err.to_string().starts_with("invalid PODFORGE_BIND_ADDR 'localhost'"));
    }
}
