//! Core error types

use thiserror::Error;

/// Reason marker carried by errors produced from a result processor's
/// `success: false` verdict.
pub const BUSINESS_ERROR: &str = "businessError";

/// Coarse-grained error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The HTTP exchange itself failed.
    Communication,
    /// The exchange succeeded but the payload was classified as a failure.
    Business,
    /// The dispatcher or transport was misconfigured.
    Configuration,
}

/// Errors surfaced to error handlers and future-mode callers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// Non-2xx response from the server.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection or other network-level failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The in-flight request was dropped before completing.
    #[error("request aborted")]
    Aborted,

    /// The result processor rejected a successful response.
    #[error("business error")]
    Business { result: serde_json::Value },

    /// Invalid transport or dispatcher configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DispatchError {
    pub fn business(result: serde_json::Value) -> Self {
        Self::Business { result }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// The reason code handed to error handlers.
    ///
    /// Communication errors use the transport's native codes; business errors
    /// always use [`BUSINESS_ERROR`].
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Status { .. } | Self::Http(_) | Self::Configuration(_) => "error",
            Self::Timeout => "timeout",
            Self::Parse(_) => "parsererror",
            Self::Aborted => "abort",
            Self::Business { .. } => BUSINESS_ERROR,
        }
    }

    /// The detail handed to error handlers alongside [`reason`](Self::reason):
    /// the processed payload for business errors, the status text or message
    /// otherwise.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            Self::Business { result } => result.clone(),
            Self::Status { message, .. } => serde_json::Value::String(message.clone()),
            Self::Http(msg) | Self::Parse(msg) | Self::Configuration(msg) => {
                serde_json::Value::String(msg.clone())
            }
            Self::Timeout | Self::Aborted => serde_json::Value::Null,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Business { .. } => ErrorCategory::Business,
            Self::Configuration(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Communication,
        }
    }

    pub fn is_business(&self) -> bool {
        matches!(self, Self::Business { .. })
    }

    /// HTTP status code, when the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
