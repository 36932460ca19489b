//! Builder for [`RequestDispatcher`].

use std::sync::Arc;
use std::time::Duration;

use super::RequestDispatcher;
use crate::delivery::DeliveryMode;
use crate::endpoint::{EndpointDescriptor, Registry};
use crate::error::DispatchError;
use crate::hooks::{self, HookSet, PreSendDecision, ProcessedResult};
use crate::interceptor::{DispatchInterceptor, LoggingInterceptor};
use crate::options::RequestOptions;
use crate::transport::{ReqwestTransport, ResponseMeta, Transport, TransportConfig};

/// Collects registry, hooks, and transport settings before building a
/// [`RequestDispatcher`].
///
/// A custom transport set through [`transport`](Self::transport) takes
/// precedence over all HTTP settings.
#[derive(Default)]
pub struct RequestDispatcherBuilder {
    registry: Registry,
    transport_config: TransportConfig,
    transport: Option<Arc<dyn Transport>>,
    mode: DeliveryMode,
    hooks: HookSet,
    interceptors: Vec<Arc<dyn DispatchInterceptor>>,
    http_debug: bool,
}

impl RequestDispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn endpoint(mut self, name: impl Into<String>, descriptor: EndpointDescriptor) -> Self {
        self.registry.register(name, descriptor);
        self
    }

    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.transport_config.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.timeout = Some(timeout);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.transport_config.headers.insert(key.into(), value.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.transport_config.user_agent = Some(user_agent.into());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn pre_send_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &EndpointDescriptor, &mut RequestOptions) -> PreSendDecision
            + Send
            + Sync
            + 'static,
    {
        self.hooks.pre_send = Some(hooks::pre_send_hook(hook));
        self
    }

    pub fn result_processor<F>(mut self, processor: F) -> Self
    where
        F: Fn(&serde_json::Value, &ResponseMeta, &RequestOptions) -> Option<ProcessedResult>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.result_processor = Some(hooks::result_processor(processor));
        self
    }

    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RequestOptions, &DispatchError) + Send + Sync + 'static,
    {
        self.hooks.error_handler = Some(hooks::error_handler(handler));
        self
    }

    pub fn interceptor(mut self, interceptor: Arc<dyn DispatchInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Enable the built-in logging interceptor.
    pub fn http_debug(mut self, enabled: bool) -> Self {
        self.http_debug = enabled;
        self
    }

    pub fn build(self) -> Result<RequestDispatcher, DispatchError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(&self.transport_config)?),
        };

        let mut interceptors = self.interceptors;
        if self.http_debug {
            interceptors.push(Arc::new(LoggingInterceptor));
        }

        Ok(RequestDispatcher {
            registry: self.registry,
            hooks: self.hooks,
            interceptors,
            mode: self.mode,
            transport,
        })
    }
}
