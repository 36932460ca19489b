//! Per-call options and the merged request they produce.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::Method;

use crate::endpoint::EndpointDescriptor;
use crate::error::DispatchError;
use crate::hooks::{ErrorCallback, SuccessCallback};
use crate::transport::Response;

/// Caller-supplied transport parameters.
///
/// Method and URL are not part of this: they always come from the
/// endpoint descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportOptions {
    /// Request headers (header-name -> value).
    pub headers: HashMap<String, String>,
    /// Extra query pairs, appended in order.
    pub query: Vec<(String, String)>,
    /// Request data. Sent as query parameters for GET/HEAD/DELETE and as a
    /// JSON body otherwise.
    pub data: Option<serde_json::Value>,
    /// Per-request timeout, overriding the transport default.
    pub timeout: Option<Duration>,
    /// `Some(false)` adds a cache-busting query parameter to GET/HEAD requests.
    pub cache: Option<bool>,
    /// Free-form parameters for custom transports.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Options for a single [`invoke`](crate::RequestDispatcher::invoke) call.
#[derive(Default)]
pub struct InvocationOptions {
    pub transport: TransportOptions,
    pub(crate) success: Option<SuccessCallback>,
    pub(crate) error: Option<ErrorCallback>,
}

impl InvocationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.transport = self.transport.header(key, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.transport = self.transport.query(key, value);
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.transport = self.transport.data(data);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.timeout(timeout);
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.transport = self.transport.cache(cache);
        self
    }

    /// Per-call success callback.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&RequestOptions, &Response) + Send + 'static,
    {
        self.success = Some(Box::new(f));
        self
    }

    /// Per-call error callback. Runs after the dispatcher-wide error handler.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&RequestOptions, &DispatchError) + Send + 'static,
    {
        self.error = Some(Box::new(f));
        self
    }

    pub fn has_success_callback(&self) -> bool {
        self.success.is_some()
    }

    pub fn has_error_callback(&self) -> bool {
        self.error.is_some()
    }
}

impl fmt::Debug for InvocationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationOptions")
            .field("transport", &self.transport)
            .field("success", &self.success.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

/// The fully merged request for one invocation.
///
/// This is the context every hook and callback receives. The pre-send hook
/// gets it mutably and may rewrite any field, including `url`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// Name the endpoint was invoked under.
    pub endpoint: String,
    /// Unique id of this invocation, for log correlation.
    pub request_id: String,
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub data: Option<serde_json::Value>,
    pub timeout: Option<Duration>,
    pub cache: Option<bool>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RequestOptions {
    /// Lay the descriptor's method and URL under the caller's options.
    pub fn merge(
        endpoint: impl Into<String>,
        descriptor: &EndpointDescriptor,
        options: TransportOptions,
    ) -> Self {
        let TransportOptions {
            headers,
            query,
            data,
            timeout,
            cache,
            extra,
        } = options;
        Self {
            endpoint: endpoint.into(),
            request_id: generate_request_id(),
            method: descriptor.method.clone(),
            url: descriptor.url.clone(),
            headers,
            query,
            data,
            timeout,
            cache,
            extra,
        }
    }

    /// Look up a boolean flag inside the request data object.
    pub fn data_flag(&self, key: &str) -> Option<bool> {
        self.data.as_ref()?.get(key)?.as_bool()
    }
}

pub(crate) fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
