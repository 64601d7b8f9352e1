//! Configuration handling for the service.
//!
//! Everything here has a development default so the server and CLI start
//! with no environment at all. The oracle credential is deliberately absent:
//! it belongs to each request, not to the process.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_ORACLE_BASE_URL: &str = "ORACLE_BASE_URL";
pub const ENV_ORACLE_MODEL: &str = "ORACLE_MODEL";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_ORACLE_TIMEOUT_SECS: &str = "ORACLE_TIMEOUT_SECS";
pub const ENV_MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
pub const ENV_OUTBOUND_CONCURRENCY: &str = "OUTBOUND_CONCURRENCY";
pub const ENV_CATALOG_HOSTS: &str = "CATALOG_HOSTS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:4000";
const DEFAULT_ORACLE_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_ORACLE_MODEL: &str = "gpt-4o-mini";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_BODY_BYTES: u64 = 10 * 1024 * 1024; // 10MB
const DEFAULT_OUTBOUND_CONCURRENCY: usize = 16;
const DEFAULT_CATALOG_HOSTS: &str = "amazon.";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Service runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    oracle_base_url: String,
    oracle_model: String,
    fetch_timeout: Duration,
    oracle_timeout: Duration,
    max_body_bytes: u64,
    outbound_concurrency: usize,
    catalog_hosts: Vec<String>,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    ///
    /// Numeric settings that are present but unparsable (or zero, for the
    /// concurrency cap) are rejected rather than silently defaulted.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let outbound_concurrency =
            parse_env(ENV_OUTBOUND_CONCURRENCY)?.unwrap_or(defaults.outbound_concurrency);
        if outbound_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_OUTBOUND_CONCURRENCY,
                reason: "must be at least 1".to_string(),
            });
        }

        let catalog_hosts = match env::var(ENV_CATALOG_HOSTS) {
            Ok(raw) => split_hosts(&raw),
            Err(_) => defaults.catalog_hosts.clone(),
        };

        Ok(Self {
            bind_addr: env::var(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
            oracle_base_url: env::var(ENV_ORACLE_BASE_URL).unwrap_or(defaults.oracle_base_url),
            oracle_model: env::var(ENV_ORACLE_MODEL).unwrap_or(defaults.oracle_model),
            fetch_timeout: parse_env(ENV_FETCH_TIMEOUT_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            oracle_timeout: parse_env(ENV_ORACLE_TIMEOUT_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.oracle_timeout),
            max_body_bytes: parse_env(ENV_MAX_BODY_BYTES)?.unwrap_or(defaults.max_body_bytes),
            outbound_concurrency,
            catalog_hosts,
        })
    }

    /// Point the oracle adapter somewhere else (tests, proxies).
    pub fn with_oracle_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.oracle_base_url = base_url.into();
        self
    }

    pub fn with_catalog_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: u64) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Base URL of the chat-completion service, without the endpoint path.
    pub fn oracle_base_url(&self) -> &str {
        &self.oracle_base_url
    }
    pub fn oracle_model(&self) -> &str {
        &self.oracle_model
    }
    pub fn connect_timeout(&self) -> Duration {
        CONNECT_TIMEOUT
    }
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    pub fn oracle_timeout(&self) -> Duration {
        self.oracle_timeout
    }
    pub fn max_body_bytes(&self) -> u64 {
        self.max_body_bytes
    }
    /// Upper bound on simultaneous outbound calls (page fetches plus oracle calls).
    pub fn outbound_concurrency(&self) -> usize {
        self.outbound_concurrency
    }
    /// Host fragments a product URL must contain, e.g. `amazon.`.
    pub fn catalog_hosts(&self) -> &[String] {
        &self.catalog_hosts
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            oracle_base_url: DEFAULT_ORACLE_BASE_URL.to_string(),
            oracle_model: DEFAULT_ORACLE_MODEL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            oracle_timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            outbound_concurrency: DEFAULT_OUTBOUND_CONCURRENCY,
            catalog_hosts: split_hosts(DEFAULT_CATALOG_HOSTS),
        }
    }
}

fn parse_env<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field: key,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn split_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
