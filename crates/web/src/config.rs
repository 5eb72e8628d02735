use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebConfigError {
    #[error("invalid HEMMY_WEB_ADDR {0:?}: {1}")]
    InvalidAddr(String, String),
}

/// Settings for the web binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub addr: SocketAddr,
}

impl WebConfig {
    pub fn from_env() -> Result<Self, WebConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WebConfigError> {
        let raw = lookup("HEMMY_WEB_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| WebConfigError::InvalidAddr(raw.clone(), e.to_string()))?;
        Ok(Self { addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_port_3000() {
        let config = WebConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr.port(), 3000);
    }

    #[test]
    fn rejects_garbage_address() {
        let err = WebConfig::from_lookup(|_| Some("localhost".into())).unwrap_err();
        assert!(matches!(err, WebConfigError::InvalidAddr(raw, _) if raw == "localhost"));
    }

    #[test]
    fn reads_override() {
        let config = WebConfig::from_lookup(|_| Some(" 127.0.0.1:8081 ".into())).unwrap();
        assert_eq!(config.addr, "127.0.0.1:8081".parse().unwrap());
    }
}
