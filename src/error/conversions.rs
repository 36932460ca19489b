//! Type Conversions for DispatchError
//!
//! From implementations for the error types the transport layer runs into.

use super::types::DispatchError;

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            )
        } else if err.is_builder() {
            Self::Configuration(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DispatchError {
    fn from(_: tokio::task::JoinError) -> Self {
        Self::Aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: DispatchError = json_err.into();
        assert!(matches!(err, DispatchError::Parse(_)));
        assert_eq!(err.reason(), "parsererror");
    }

    #[tokio::test]
    async fn test_from_join_error_is_abort() {
        let handle = tokio::spawn(futures::future::pending::<()>());
        handle.abort();
        let join_err = handle.await.unwrap_err();
        let err: DispatchError = join_err.into();
        assert_eq!(err, DispatchError::Aborted);
    }
}
