//! Environment-driven client configuration.
//!
//! # Responsibility
//! - Resolve backend URL, timeouts, list defaults and logging settings.
//! - Keep resolution testable through an injectable variable lookup.
//!
//! # Invariants
//! - Empty or whitespace-only variables fall back to defaults.
//! - Invalid values are rejected, never silently clamped.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "CATALOG_API_URL";
pub const ENV_PAGE_SIZE: &str = "CATALOG_PAGE_SIZE";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "CATALOG_REQUEST_TIMEOUT_MS";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "CATALOG_CONNECT_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "CATALOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CATALOG_LOG_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:3002";
pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 100;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_LOG_DIR_NAME: &str = "catalog-logs";

/// Configuration resolution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Backend base URL without trailing slash.
    pub api_base_url: String,
    /// Initial list page size, `1..=MAX_PAGE_SIZE`.
    pub page_size: usize,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            log_level: default_log_level().to_string(),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        }
    }
}

impl CatalogConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, applying defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(url) = read(ENV_API_URL) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = read(ENV_PAGE_SIZE) {
            config.page_size = parse_page_size(raw)?;
        }
        if let Some(raw) = read(ENV_REQUEST_TIMEOUT_MS) {
            config.request_timeout = parse_timeout(ENV_REQUEST_TIMEOUT_MS, raw)?;
        }
        if let Some(raw) = read(ENV_CONNECT_TIMEOUT_MS) {
            config.connect_timeout = parse_timeout(ENV_CONNECT_TIMEOUT_MS, raw)?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Overrides the backend URL, e.g. from a command-line flag.
    pub fn with_api_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.api_base_url = url.as_ref().trim().trim_end_matches('/').to_string();
        self
    }
}

fn parse_page_size(raw: String) -> Result<usize, ConfigError> {
    match raw.parse::<usize>() {
        Ok(value) if (1..=MAX_PAGE_SIZE).contains(&value) => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            key: ENV_PAGE_SIZE,
            value: raw,
            reason: "expected an integer between 1 and 100",
        }),
    }
}

fn parse_timeout(key: &'static str, raw: String) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(Duration::from_millis(value)),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw,
            reason: "expected a positive number of milliseconds",
        }),
    }
}
