//! HTTP transport abstraction.
//!
//! The dispatcher never talks to the network itself: it hands the merged
//! [`RequestOptions`] to a [`Transport`]. The default is
//! [`ReqwestTransport`]; tests and embedders can inject their own
//! implementation to observe requests or return canned responses.

mod reqwest_transport;

pub use reqwest_transport::{ReqwestTransport, build_http_client_from_config};

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::options::RequestOptions;

/// Status text attached to every successful delivery.
pub const STATUS_SUCCESS: &str = "success";

/// Metadata of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMeta {
    /// HTTP status; `None` for substituted results.
    pub status: Option<StatusCode>,
    pub status_text: String,
    /// Response headers; `None` for substituted results.
    pub headers: Option<HeaderMap>,
}

impl ResponseMeta {
    pub fn from_http(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            status: Some(status),
            status_text: STATUS_SUCCESS.to_string(),
            headers: Some(headers),
        }
    }

    /// Metadata for a result supplied by the pre-send hook instead of the network.
    pub fn substituted() -> Self {
        Self {
            status: None,
            status_text: STATUS_SUCCESS.to_string(),
            headers: None,
        }
    }

    pub fn is_substituted(&self) -> bool {
        self.status.is_none()
    }
}

/// A successful response: the (possibly processed) JSON body plus metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub body: serde_json::Value,
    pub meta: ResponseMeta,
}

impl Response {
    pub fn substituted(body: serde_json::Value) -> Self {
        Self {
            body,
            meta: ResponseMeta::substituted(),
        }
    }
}

/// Performs one HTTP round trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestOptions) -> Result<Response, DispatchError>;
}

/// Configuration for the default reqwest-backed transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Prefix for relative descriptor URLs.
    pub base_url: Option<String>,
    /// Request timeout
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Default headers applied to all requests
    pub headers: HashMap<String, String>,
    /// Proxy settings
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transport_config_deserializes_with_defaults() {
        let config: TransportConfig = serde_json::from_value(json!({
            "base_url": "http://localhost:8080",
            "timeout": 30
        }))
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout, None);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn substituted_meta_has_no_http_details() {
        let meta = ResponseMeta::substituted();
        assert!(meta.is_substituted());
        assert_eq!(meta.status_text, STATUS_SUCCESS);
        assert!(meta.headers.is_none());
    }
}
