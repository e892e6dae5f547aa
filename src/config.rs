//! Runtime configuration, read once at startup.

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Base URL of the portfolio backend, e.g. `https://api.example.com`.
pub const API_URL_VAR: &str = "PORTFOLIO_API_URL";

/// Optional per-request timeout in whole seconds.
pub const REQUEST_TIMEOUT_VAR: &str = "PORTFOLIO_REQUEST_TIMEOUT_SECS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    api_base: String,
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    /// Validates `api_base` as an http(s) URL. A trailing `/` is dropped.
    pub fn new(api_base: impl Into<String>) -> Result<Self, ConfigError> {
        let api_base = api_base.into();
        let invalid = |reason: String| ConfigError::Invalid {
            var: API_URL_VAR,
            value: api_base.clone(),
            reason,
        };

        let url = Url::parse(&api_base).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            request_timeout: None,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = lookup(API_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(API_URL_VAR))?;
        let mut config = Self::new(base.trim())?;

        if let Some(raw) = lookup(REQUEST_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: REQUEST_TIMEOUT_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Joins `path` (which starts with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}
