//! Dispatch Interceptor interfaces
//!
//! Unlike the single-slot hooks, interceptors stack: they run in the order
//! they were added. They can adjust the outgoing request, observe raw
//! responses before result processing, and get notified of every error ahead
//! of the error handlers. The hooks are best-effort and should avoid
//! expensive work.

use crate::error::DispatchError;
use crate::options::RequestOptions;
use crate::transport::Response;

/// Dispatch interceptor trait
pub trait DispatchInterceptor: Send + Sync {
    /// Called right before the transport call (not for substituted results).
    /// Returning an error short-circuits the request through the error path.
    fn on_before_send(&self, _request: &mut RequestOptions) -> Result<(), DispatchError> {
        Ok(())
    }

    /// Called with the raw response, before the result processor runs.
    fn on_response(&self, _request: &RequestOptions, _response: &Response) {}

    /// Called on every error, before the error handlers.
    fn on_error(&self, _request: &RequestOptions, _error: &DispatchError) {}
}

/// A simple logging interceptor backed by `tracing` (no payloads logged).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl DispatchInterceptor for LoggingInterceptor {
    fn on_before_send(&self, request: &mut RequestOptions) -> Result<(), DispatchError> {
        tracing::debug!(target: "backend_api::http", endpoint=%request.endpoint, request_id=%request.request_id, method=%request.method, url=%request.url, "sending request");
        Ok(())
    }

    fn on_response(&self, request: &RequestOptions, response: &Response) {
        let status = response.meta.status.map(|s| s.as_u16()).unwrap_or_default();
        tracing::debug!(target: "backend_api::http", endpoint=%request.endpoint, request_id=%request.request_id, status, "response received");
    }

    fn on_error(&self, request: &RequestOptions, error: &DispatchError) {
        tracing::debug!(target: "backend_api::http", endpoint=%request.endpoint, request_id=%request.request_id, reason=%error.reason(), err=%error, "request error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointDescriptor;
    use crate::options::TransportOptions;
    use crate::transport::ResponseMeta;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn logging_interceptor_emits_debug_events() {
        let it = LoggingInterceptor;
        let mut req = RequestOptions::merge(
            "users",
            &EndpointDescriptor::get("/users"),
            TransportOptions::new(),
        );

        it.on_before_send(&mut req).unwrap();
        it.on_response(
            &req,
            &Response {
                body: serde_json::Value::Null,
                meta: ResponseMeta::substituted(),
            },
        );
        it.on_error(&req, &DispatchError::Timeout);

        assert!(logs_contain("sending request"));
        assert!(logs_contain("response received"));
        assert!(logs_contain("reason=timeout"));
    }
}
