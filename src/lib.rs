//! Async Rust client for the NexusVoid prompt-analysis API.
//!
//! ```rust,no_run
//! use nexusvoid::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nexusvoid::NexusVoidError> {
//!     let client = Client::new(ClientConfig::new("your-api-key"))?;
//!
//!     let result = client.analyze("My card number is 4111 1111 1111 1111").await?;
//!     if !result.is_safe {
//!         println!("{}", result.redacted_prompt);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Rate limits, timeouts and 5xx responses are retried with a linear
//! backoff (1s, 2s, 3s, ...). Every failure is a [`NexusVoidError`] whose
//! [`ErrorKind`] says what went wrong.

mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::{Client, MAX_PROMPT_CHARS};
pub use config::{AnalysisOptions, ClientConfig, DEFAULT_ENDPOINT};
pub use error::{ErrorKind, NexusVoidError, Result};
pub use types::{AnalysisResult, AnalysisSummary, Finding, HealthStatus, ProcessingMetadata};
