//! HTTP plumbing: single request attempts, error classification and retry.

mod client;
mod retry;

pub use client::HttpClient;
pub use retry::{RETRY_BASE_DELAY_MS, RequestFailure, backoff_delay, classify, retry_request};
