//! Client configuration and per-call overrides.

use std::fmt;

use crate::error::{NexusVoidError, Result};

/// Production API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.nexusvoid.com";

/// Per-attempt request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const ENV_API_KEY: &str = "NEXUSVOID_API_KEY";
const ENV_ENDPOINT: &str = "NEXUSVOID_ENDPOINT";
const ENV_TIMEOUT_MS: &str = "NEXUSVOID_TIMEOUT_MS";
const ENV_MAX_RETRIES: &str = "NEXUSVOID_MAX_RETRIES";

/// Settings used by [`crate::Client`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub endpoint: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

impl ClientConfig {
    /// Creates a configuration with the given API key and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Loads the configuration from `NEXUSVOID_*` environment variables.
    ///
    /// `NEXUSVOID_API_KEY` is required; `NEXUSVOID_ENDPOINT`,
    /// `NEXUSVOID_TIMEOUT_MS` and `NEXUSVOID_MAX_RETRIES` fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                NexusVoidError::validation(format!(
                    "{} environment variable is not set",
                    ENV_API_KEY
                ))
            })?;

        let mut config = Self::new(api_key);

        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|e| !e.is_empty()) {
            config.endpoint = endpoint;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = parse_number(ENV_TIMEOUT_MS, &timeout)?;
        }
        if let Some(retries) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = parse_number(ENV_MAX_RETRIES, &retries)?;
        }

        Ok(config)
    }

    /// Joins `path` onto the endpoint, ignoring a trailing slash on the endpoint.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("endpoint", &self.endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        NexusVoidError::validation(format!(
            "{} must be a non-negative integer, got '{}'",
            name, value
        ))
    })
}

/// Keeps the first and last four characters of a key, or nothing for short keys.
pub(crate) fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

/// Per-call overrides for [`crate::Client::analyze_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisOptions {
    pub timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
}

impl AnalysisOptions {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }
}
