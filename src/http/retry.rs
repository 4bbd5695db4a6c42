//! Retry logic for API requests with error classification.

use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;

use crate::error::{ErrorKind, NexusVoidError, Result};

/// Base delay between retry attempts in milliseconds.
///
/// The n-th retry waits `n * RETRY_BASE_DELAY_MS`.
pub const RETRY_BASE_DELAY_MS: u64 = 1000;

const UNABLE_TO_CONNECT: &str = "Unable to connect to NexusVoid API";

/// A failed request attempt before it is classified.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestFailure {
    /// The service answered with a non-success status.
    Status { status: u16, body: Option<Value> },
    /// The attempt deadline elapsed.
    Timeout(String),
    /// The service could not be reached.
    Connect(String),
    /// Any other transport failure.
    Other(String),
}

/// Transport errors only. Non-success statuses are read from the response
/// and reported as [`RequestFailure::Status`] with their body.
impl From<reqwest::Error> for RequestFailure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RequestFailure::Timeout(error.to_string())
        } else if error.is_connect() {
            RequestFailure::Connect(error.to_string())
        } else {
            RequestFailure::Other(error.to_string())
        }
    }
}

/// Maps a failed attempt onto the error taxonomy.
///
/// The message comes from the body's `error` or `message` field, then the
/// transport message, then the kind's default.
pub fn classify(failure: &RequestFailure) -> NexusVoidError {
    match failure {
        RequestFailure::Status { status, body } => {
            let kind = match *status {
                401 => ErrorKind::Authentication,
                429 => ErrorKind::RateLimit,
                400 => ErrorKind::Validation,
                408 => ErrorKind::Timeout,
                500 | 502 | 503 | 504 => ErrorKind::Service,
                _ => ErrorKind::Http,
            };
            let message = body
                .as_ref()
                .and_then(body_message)
                .unwrap_or_else(|| format!("Request failed with status code {}", status));

            let error = NexusVoidError::new(kind, message).with_response(body.clone());
            match kind {
                ErrorKind::Service | ErrorKind::Http => error.with_status(*status),
                _ => error,
            }
        }
        RequestFailure::Timeout(message) => {
            NexusVoidError::new(ErrorKind::Timeout, or_default(message, ErrorKind::Timeout))
        }
        RequestFailure::Connect(_) => NexusVoidError::service(UNABLE_TO_CONNECT),
        RequestFailure::Other(message) => {
            NexusVoidError::unknown(or_default(message, ErrorKind::Unknown))
        }
    }
}

fn body_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|field| body.get(field).and_then(Value::as_str))
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

fn or_default(message: &str, kind: ErrorKind) -> String {
    if message.is_empty() {
        kind.default_message().to_string()
    } else {
        message.to_string()
    }
}

/// Delay before the next attempt, given the retry budget still remaining.
///
/// Grows linearly: one second before the first retry, two before the second.
pub fn backoff_delay(max_retries: u32, remaining: u32) -> Duration {
    let retry_number = u64::from(max_retries.saturating_sub(remaining)) + 1;
    Duration::from_millis(RETRY_BASE_DELAY_MS * retry_number)
}

/// Executes `operation`, retrying rate limits, timeouts and 5xx service errors.
///
/// At most `max_retries + 1` attempts are made. Any other error is returned
/// immediately.
pub async fn retry_request<F, Fut, T>(
    operation_name: &str,
    max_retries: u32,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let total_attempts = u64::from(max_retries) + 1;
    let mut remaining = max_retries;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !e.is_retryable() {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }

                if remaining == 0 {
                    warn!(
                        "{}: giving up after {} attempts: {}",
                        operation_name, total_attempts, e
                    );
                    return Err(e);
                }

                let delay = backoff_delay(max_retries, remaining);
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                    operation_name,
                    u64::from(max_retries - remaining) + 1,
                    total_attempts,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                remaining -= 1;
            }
        }
    }
}
