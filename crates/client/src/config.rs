//! Client configuration from the environment.

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("invalid page size '{0}': must be a positive integer")]
    InvalidPageSize(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Read `HEMMY_API_URL` and `HEMMY_PAGE_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("HEMMY_API_URL") {
            Some(raw) => parse_base_url(&raw)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let page_size = match lookup("HEMMY_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidPageSize(raw))?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self { api_url, page_size })
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(
            raw.to_string(),
            "scheme must be http or https".to_string(),
        ));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
