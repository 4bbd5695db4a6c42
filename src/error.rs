//! Error type shared by every client operation.

use serde_json::Value;
use thiserror::Error;

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, NexusVoidError>;

/// The failure class of a [`NexusVoidError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP status with no dedicated mapping.
    Http,
    /// Anything that is neither an HTTP status nor a known transport failure.
    Unknown,
    /// HTTP 401.
    Authentication,
    /// HTTP 429.
    RateLimit,
    /// HTTP 400, or input rejected before sending.
    Validation,
    /// HTTP 5xx or the service could not be reached.
    Service,
    /// HTTP 408 or the request deadline elapsed.
    Timeout,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Http => "HTTP_ERROR",
            ErrorKind::Unknown => "UNKNOWN_ERROR",
            ErrorKind::Authentication => "AUTH_ERROR",
            ErrorKind::RateLimit => "RATE_LIMIT_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Service => "SERVICE_ERROR",
            ErrorKind::Timeout => "TIMEOUT_ERROR",
        }
    }

    fn default_status(&self) -> Option<u16> {
        match self {
            ErrorKind::Http | ErrorKind::Unknown => None,
            ErrorKind::Authentication => Some(401),
            ErrorKind::RateLimit => Some(429),
            ErrorKind::Validation => Some(400),
            ErrorKind::Service => Some(500),
            ErrorKind::Timeout => Some(408),
        }
    }

    pub(crate) fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::Http => "Request failed",
            ErrorKind::Unknown => "An unknown error occurred",
            ErrorKind::Authentication => "Authentication failed",
            ErrorKind::RateLimit => "Rate limit exceeded",
            ErrorKind::Validation => "Validation failed",
            ErrorKind::Service => "Service error",
            ErrorKind::Timeout => "Request timeout",
        }
    }
}

/// An error returned by the NexusVoid client.
///
/// Every failure carries its [`ErrorKind`], a human-readable message, the
/// HTTP status associated with it (if any) and the raw response body that
/// produced it (if any).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[{}] {message}", .kind.code())]
pub struct NexusVoidError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    response: Option<Value>,
}

impl NexusVoidError {
    /// Creates an error of the given kind with the kind's default status.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: kind.default_status(),
            response: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Service, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    /// Overrides the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the raw response body.
    pub fn with_response(mut self, response: Option<Value>) -> Self {
        self.response = response;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The raw response body, if the failure came from a response.
    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    /// Whether the retry policy may attempt the request again.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            ErrorKind::RateLimit | ErrorKind::Timeout => true,
            ErrorKind::Service => self.status.is_some_and(|s| s >= 500),
            _ => false,
        }
    }

    pub fn is_authentication_error(&self) -> bool {
        self.kind == ErrorKind::Authentication
    }

    pub fn is_rate_limit_error(&self) -> bool {
        self.kind == ErrorKind::RateLimit
    }

    pub fn is_validation_error(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    pub fn is_service_error(&self) -> bool {
        self.kind == ErrorKind::Service
    }

    pub fn is_timeout_error(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}
