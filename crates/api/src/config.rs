//! Process configuration, read from the environment.

use std::net::SocketAddr;

use thiserror::Error;

use personnel_infra::{ConfigError as StoreConfigError, StoreSettings};

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HTTP_ADDR {0:?} is not a socket address")]
    InvalidAddr(String),

    #[error(transparent)]
    Store(#[from] StoreConfigError),
}

/// API server configuration.
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | `HTTP_ADDR` | `0.0.0.0:8080` | listen address |
/// | `DATABASE_URL`, `EMPLOYEES_TABLE` | | see [`StoreSettings`] |
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub http_addr: SocketAddr,
    pub store: StoreSettings,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = var("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw_addr.clone()))?;

        Ok(Self {
            http_addr,
            store: StoreSettings::from_lookup(&var)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personnel_infra::StoreBackend;

    #[test]
    fn defaults() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.http_addr, DEFAULT_HTTP_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.store.backend, StoreBackend::InMemory);
    }

    #[test]
    fn rejects_bad_listen_address() {
        let err = ApiConfig::from_lookup(|key| (key == "HTTP_ADDR").then(|| "nowhere".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr(addr) if addr == "nowhere"));
    }
}
