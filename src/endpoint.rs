//! Endpoint descriptors and the name → descriptor registry.
//!
//! A descriptor fixes the HTTP verb and URL of one backend API. Anything else
//! a project wants to attach to an endpoint (cache policy, auth scope, ...)
//! goes into `extra`, which hooks can read but which is never forwarded to the
//! transport. Keeping those apart avoids clashes between endpoint settings and
//! per-call transport options of the same name.

use std::collections::HashMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Fixed parameters of one named HTTP call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// HTTP verb. Accepts `type` as an alias in configuration input.
    #[serde(alias = "type", with = "method_serde")]
    pub method: Method,
    /// Absolute URL, or a path relative to the transport's base URL.
    pub url: String,
    /// Non-transport settings available to hooks.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EndpointDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attach a non-transport setting.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Mapping from logical API name to its descriptor.
///
/// There is no removal API: entries are only added, overwritten, or replaced
/// wholesale through [`RequestDispatcher::configure`](crate::RequestDispatcher::configure).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    endpoints: HashMap<String, EndpointDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite an entry. Overwriting is allowed but logged.
    pub fn register(&mut self, name: impl Into<String>, descriptor: EndpointDescriptor) {
        let name = name.into();
        if self.endpoints.contains_key(&name) {
            tracing::warn!(target: "backend_api::dispatch", endpoint = %name, "overwriting endpoint descriptor");
        }
        self.endpoints.insert(name, descriptor);
    }

    pub fn lookup(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Registered names (unordered).
    pub fn names(&self) -> Vec<&str> {
        self.endpoints.keys().map(|s| s.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EndpointDescriptor)> {
        self.endpoints.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, EndpointDescriptor)> for Registry {
    fn from_iter<I: IntoIterator<Item = (K, EndpointDescriptor)>>(iter: I) -> Self {
        Self {
            endpoints: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<HashMap<String, EndpointDescriptor>> for Registry {
    fn from(endpoints: HashMap<String, EndpointDescriptor>) -> Self {
        Self { endpoints }
    }
}

mod method_serde {
    use reqwest::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(method: &Method, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Method, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Method::from_bytes(raw.to_ascii_uppercase().as_bytes()).map_err(serde::de::Error::custom)
    }
}
