//! Request dispatcher
//!
//! [`RequestDispatcher`] owns the endpoint registry, the single-slot hooks,
//! the interceptor list and the transport. Configuration methods take
//! `&mut self`; [`invoke`](RequestDispatcher::invoke) takes `&self` and
//! snapshots everything it needs, so an in-flight request never observes a
//! hook being swapped.

mod builder;
mod pipeline;

pub use builder::RequestDispatcherBuilder;

use std::fmt;
use std::sync::Arc;

use crate::delivery::{CallbackHandle, DeliveryMode, InvocationHandle, ResponseFuture};
use crate::endpoint::{EndpointDescriptor, Registry};
use crate::error::DispatchError;
use crate::hooks::{self, HookSet, PreSendDecision, ProcessedResult};
use crate::interceptor::DispatchInterceptor;
use crate::options::{InvocationOptions, RequestOptions};
use crate::transport::{ReqwestTransport, ResponseMeta, Transport};
use pipeline::Invocation;

/// Named-endpoint request dispatcher.
pub struct RequestDispatcher {
    registry: Registry,
    hooks: HookSet,
    interceptors: Vec<Arc<dyn DispatchInterceptor>>,
    mode: DeliveryMode,
    transport: Arc<dyn Transport>,
}

impl RequestDispatcher {
    /// Create a dispatcher over `registry` with a default reqwest transport
    /// and future delivery.
    pub fn new(registry: Registry) -> Self {
        Self::with_transport(
            registry,
            Arc::new(ReqwestTransport::with_client(reqwest::Client::new(), None)),
        )
    }

    pub fn with_transport(registry: Registry, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            hooks: HookSet::default(),
            interceptors: Vec::new(),
            mode: DeliveryMode::default(),
            transport,
        }
    }

    pub fn builder() -> RequestDispatcherBuilder {
        RequestDispatcherBuilder::new()
    }

    /// Replace the whole registry.
    pub fn configure(&mut self, registry: Registry) {
        self.registry = registry;
    }

    /// Add or overwrite one endpoint. Overwriting logs a warning.
    pub fn register(&mut self, name: impl Into<String>, descriptor: EndpointDescriptor) {
        self.registry.register(name, descriptor);
    }

    pub fn lookup(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.registry.lookup(name)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn set_pre_send_hook<F>(&mut self, hook: F)
    where
        F: Fn(&str, &EndpointDescriptor, &mut RequestOptions) -> PreSendDecision
            + Send
            + Sync
            + 'static,
    {
        self.hooks.pre_send = Some(hooks::pre_send_hook(hook));
    }

    pub fn clear_pre_send_hook(&mut self) {
        self.hooks.pre_send = None;
    }

    pub fn set_result_processor<F>(&mut self, processor: F)
    where
        F: Fn(&serde_json::Value, &ResponseMeta, &RequestOptions) -> Option<ProcessedResult>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.result_processor = Some(hooks::result_processor(processor));
    }

    pub fn clear_result_processor(&mut self) {
        self.hooks.result_processor = None;
    }

    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&RequestOptions, &DispatchError) + Send + Sync + 'static,
    {
        self.hooks.error_handler = Some(hooks::error_handler(handler));
    }

    pub fn clear_error_handler(&mut self) {
        self.hooks.error_handler = None;
    }

    pub fn set_delivery_mode(&mut self, mode: DeliveryMode) {
        self.mode = mode;
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Append an interceptor. Interceptors run in insertion order.
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn DispatchInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = transport;
    }

    /// Call the endpoint registered under `name`.
    ///
    /// Returns `None` (and logs a warning) when no such endpoint exists; no
    /// request is made in that case. Must be called from within a tokio
    /// runtime: handlers and the transport call run on a spawned task, never
    /// inside this call.
    pub fn invoke(&self, name: &str, options: InvocationOptions) -> Option<InvocationHandle> {
        let Some(descriptor) = self.registry.lookup(name) else {
            tracing::warn!(target: "backend_api::dispatch", endpoint=%name, "no endpoint registered under this name");
            return None;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!(target: "backend_api::dispatch", endpoint=%name, "invoke called outside of a tokio runtime");
            return None;
        };

        let InvocationOptions {
            transport: transport_options,
            success,
            error,
        } = options;
        let mut request = RequestOptions::merge(name, descriptor, transport_options);

        let decision = match &self.hooks.pre_send {
            Some(hook) => hook(name, descriptor, &mut request),
            None => PreSendDecision::Send,
        };

        tracing::debug!(target: "backend_api::dispatch", endpoint=%name, request_id=%request.request_id, mode=%self.mode, method=%request.method, url=%request.url, "dispatching");

        let invocation = Invocation {
            request,
            decision,
            hooks: self.hooks.clone(),
            interceptors: self.interceptors.clone(),
            transport: self.transport.clone(),
            success,
            error,
        };

        Some(match self.mode {
            DeliveryMode::Callback => InvocationHandle::Callback(CallbackHandle::new(
                runtime.spawn(async move {
                    // results already went to the callbacks
                    let _ = invocation.run().await;
                }),
            )),
            DeliveryMode::Future => {
                InvocationHandle::Future(ResponseFuture::new(runtime.spawn(invocation.run())))
            }
        })
    }
}

impl fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("endpoints", &self.registry.len())
            .field("pre_send_hook", &self.hooks.pre_send.is_some())
            .field("result_processor", &self.hooks.result_processor.is_some())
            .field("error_handler", &self.hooks.error_handler.is_some())
            .field("interceptors", &self.interceptors.len())
            .field("mode", &self.mode)
            .finish()
    }
}
