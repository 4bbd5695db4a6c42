//! The public NexusVoid API client.

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::config::{AnalysisOptions, ClientConfig, mask_api_key};
use crate::error::{NexusVoidError, Result};
use crate::http::{HttpClient, retry_request};
use crate::types::{AnalysisResult, HealthStatus};

/// Longest prompt accepted by [`Client::analyze`], in characters.
pub const MAX_PROMPT_CHARS: usize = 10_000;

const ANALYZE_PATH: &str = "/v1/prompt-analysis/analyze";
const HEALTH_PATH: &str = "/v1/prompt-analysis/health";
const USER_AGENT: &str = concat!("nexusvoid-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    prompt: &'a str,
}

/// Client for the NexusVoid prompt-analysis API.
///
/// Cloning is cheap; clones share the connection pool and the configuration,
/// so [`Client::set_api_key`] on one clone is seen by all of them. Every
/// request attempt reads the configuration when it is built, which means a
/// setter called while a retry sequence is running applies to the remaining
/// attempts of that sequence.
#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    config: Arc<RwLock<ClientConfig>>,
}

impl Client {
    /// Creates a client. Fails if the API key is empty.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(NexusVoidError::validation("API key is required"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| NexusVoidError::unknown(format!("Failed to build HTTP client: {}", e)))?;

        debug!(
            "Created NexusVoid client for {} using API key {}",
            config.endpoint,
            mask_api_key(&config.api_key)
        );

        Ok(Self {
            http: HttpClient::new(client),
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Creates a client from `NEXUSVOID_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Analyzes a prompt using the client's timeout and retry settings.
    pub async fn analyze(&self, prompt: &str) -> Result<AnalysisResult> {
        self.analyze_with_options(prompt, &AnalysisOptions::default())
            .await
    }

    /// Analyzes a prompt, overriding timeout and retry budget for this call only.
    ///
    /// Empty prompts and prompts longer than [`MAX_PROMPT_CHARS`] are rejected
    /// with a validation error before anything is sent.
    #[tracing::instrument(skip(self, prompt), fields(prompt_chars = prompt.chars().count()))]
    pub async fn analyze_with_options(
        &self,
        prompt: &str,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult> {
        validate_prompt(prompt)?;

        let max_retries = options
            .max_retries
            .unwrap_or_else(|| self.read_config().max_retries);
        let body = AnalyzeRequest { prompt };

        retry_request("Analyzing prompt", max_retries, || async {
            let config = self.read_config();
            let timeout = Duration::from_millis(options.timeout_ms.unwrap_or(config.timeout_ms));
            self.http
                .post_json(&config.url(ANALYZE_PATH), &config.api_key, timeout, &body)
                .await
        })
        .await
    }

    /// Fetches the service health. Not retried.
    #[tracing::instrument(skip(self))]
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let config = self.read_config();
        self.http
            .get_json(
                &config.url(HEALTH_PATH),
                &config.api_key,
                Duration::from_millis(config.timeout_ms),
            )
            .await
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> ClientConfig {
        self.read_config()
    }

    /// Replaces the API key used by subsequent requests.
    pub fn set_api_key(&self, api_key: impl Into<String>) {
        let api_key = api_key.into();
        debug!("Switching API key to {}", mask_api_key(&api_key));
        self.write_config(|config| config.api_key = api_key);
    }

    /// Replaces the endpoint used by subsequent requests.
    pub fn set_endpoint(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        debug!("Switching endpoint to {}", endpoint);
        self.write_config(|config| config.endpoint = endpoint);
    }

    fn read_config(&self) -> ClientConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_config(&self, update: impl FnOnce(&mut ClientConfig)) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut config);
    }
}

fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.is_empty() {
        return Err(NexusVoidError::validation(
            "Prompt is required and must be a non-empty string",
        ));
    }

    let chars = prompt.chars().count();
    if chars > MAX_PROMPT_CHARS {
        return Err(NexusVoidError::validation(format!(
            "Prompt exceeds maximum length of {} characters (got {})",
            MAX_PROMPT_CHARS, chars
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_api_key() {
        let err = Client::new(ClientConfig::new("  ")).err().unwrap();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_new_with_defaults() {
        let client = Client::new(ClientConfig::new("key")).unwrap();
        let config = client.config();

        assert_eq!(config.endpoint, "https://api.nexusvoid.com");
        assert_eq!(config.timeout_ms, 30000);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_config_is_a_snapshot() {
        let client = Client::new(ClientConfig::new("key")).unwrap();

        let mut snapshot = client.config();
        snapshot.api_key = "tampered".to_string();
        snapshot.endpoint = "http://evil".to_string();

        assert_eq!(client.config().api_key, "key");
        assert_eq!(client.config().endpoint, "https://api.nexusvoid.com");
    }

    #[test]
    fn test_setters_are_shared_between_clones() {
        let client = Client::new(ClientConfig::new("key")).unwrap();
        let clone = client.clone();

        client.set_api_key("other");
        client.set_endpoint("http://localhost:9000");

        assert_eq!(clone.config().api_key, "other");
        assert_eq!(clone.config().endpoint, "http://localhost:9000");
    }

    #[test]
    fn test_validate_prompt() {
        assert!(validate_prompt("hello").is_ok());
        assert!(validate_prompt(&"a".repeat(MAX_PROMPT_CHARS)).is_ok());

        let err = validate_prompt("").unwrap_err();
        assert!(err.is_validation_error());

        let err = validate_prompt(&"a".repeat(MAX_PROMPT_CHARS + 1)).unwrap_err();
        assert!(err.is_validation_error());
        assert!(err.message().contains("10000"));
    }

    #[test]
    fn test_validate_prompt_counts_characters_not_bytes() {
        // 10,000 three-byte characters
        let prompt = "€".repeat(MAX_PROMPT_CHARS);
        assert!(validate_prompt(&prompt).is_ok());
    }
}
