//! Backend location and timeout.
//!
//! Values come from the environment so the same build can point at a local
//! mock server or a deployed backend:
//!
//! - `JOBBOARD_API_HOST` (default `localhost`)
//! - `JOBBOARD_API_PORT` (default `8000`)
//! - `JOBBOARD_API_PREFIX` (default `/api`)
//! - `JOBBOARD_API_TIMEOUT_MS` (default `10000`)

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_PREFIX: &str = "/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be a valid number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("invalid base URL {0:?}: expected http(s)://host[:port][/prefix]")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path_prefix: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path_prefix: DEFAULT_PREFIX.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes `env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("JOBBOARD_API_HOST").filter(|h| !h.is_empty()) {
            config.host = host;
        }
        if let Some(port) = lookup("JOBBOARD_API_PORT") {
            config.port = parse_number("JOBBOARD_API_PORT", &port)?;
        }
        if let Some(prefix) = lookup("JOBBOARD_API_PREFIX") {
            config.path_prefix = prefix;
        }
        if let Some(timeout) = lookup("JOBBOARD_API_TIMEOUT_MS") {
            config.timeout_ms = parse_number("JOBBOARD_API_TIMEOUT_MS", &timeout)?;
        }
        Ok(config)
    }

    /// Parse a full base URL such as `http://127.0.0.1:8000/api`, keeping the
    /// current timeout.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidBaseUrl(url.to_string());
        let (scheme, rest) = url.split_once("://").ok_or_else(invalid)?;
        if scheme != "http" && scheme != "https" {
            return Err(invalid());
        }
        let (authority, prefix) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        // A bracketed IPv6 literal keeps its brackets and colons.
        let (host, port) = match authority.strip_prefix('[') {
            Some(inner) => {
                let end = inner.find(']').ok_or_else(invalid)?;
                let (literal, after) = authority.split_at(end + 2);
                if after.is_empty() {
                    (literal, None)
                } else {
                    (literal, Some(after.strip_prefix(':').ok_or_else(invalid)?))
                }
            }
            None => match authority.rsplit_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (authority, None),
            },
        };
        let port = match port {
            Some(port) => port.parse().map_err(|_| invalid())?,
            None if scheme == "https" => 443,
            None => 80,
        };
        if host.is_empty() || host == "[]" || (!host.starts_with('[') && host.contains(':')) {
            return Err(invalid());
        }
        self.scheme = scheme.to_string();
        self.host = host.to_string();
        self.port = port;
        self.path_prefix = prefix.to_string();
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// `scheme://host:port/prefix` with no trailing slash.
    pub fn base_url(&self) -> String {
        let prefix = self.path_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}/{prefix}", self.scheme, self.host, self.port)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}
