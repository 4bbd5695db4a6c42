//! Single-attempt HTTP requests against the NexusVoid API.

use log::debug;
use reqwest::{
    Client, RequestBuilder,
    header::{AUTHORIZATION, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;

use super::retry::{RequestFailure, classify};
use crate::error::{NexusVoidError, Result};

/// Thin wrapper over a reqwest [`Client`] that attaches credentials and
/// turns every failure into a classified [`NexusVoidError`].
///
/// Requests are issued exactly once; retrying is the caller's concern.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a POST with a JSON body and deserializes the JSON response.
    #[tracing::instrument(skip(self, api_key, body))]
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        api_key: &str,
        timeout: Duration,
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST JSON to {}...", url);
        let request = self.client.post(url).timeout(timeout).json(body);
        self.execute(request, api_key).await
    }

    /// Performs a GET and deserializes the JSON response.
    #[tracing::instrument(skip(self, api_key))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<T> {
        debug!("GET JSON from {}...", url);
        let request = self.client.get(url).timeout(timeout);
        self.execute(request, api_key).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        api_key: &str,
    ) -> Result<T> {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
            NexusVoidError::validation("API key contains characters not allowed in an HTTP header")
        })?;
        auth_value.set_sensitive(true);

        let response = request
            .header(AUTHORIZATION, auth_value)
            .send()
            .await
            .map_err(failure)?;

        let status = response.status();
        let text = response.text().await.map_err(failure)?;

        if !status.is_success() {
            debug!("Request failed with HTTP {}", status.as_u16());
            return Err(classify(&RequestFailure::Status {
                status: status.as_u16(),
                body: raw_body(&text),
            }));
        }

        serde_json::from_str(&text).map_err(|e| {
            NexusVoidError::service(format!("Failed to parse response from NexusVoid API: {}", e))
                .with_status(status.as_u16())
                .with_response(raw_body(&text))
        })
    }
}

fn failure(error: reqwest::Error) -> NexusVoidError {
    classify(&RequestFailure::from(error))
}

/// The response body as JSON, or as a JSON string when it is not JSON.
fn raw_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}
