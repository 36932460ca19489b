//! One invocation, from pre-send decision to delivery.
//!
//! Order of effects for a single call:
//! 1. interceptors `on_before_send` (only when actually sending)
//! 2. transport call, or the substituted result
//! 3. interceptors `on_response` (transport responses only)
//! 4. result processor
//! 5. success: per-call success callback;
//!    error: interceptors `on_error`, global error handler, per-call error callback

use std::sync::Arc;

use crate::error::DispatchError;
use crate::hooks::{ErrorCallback, HookSet, PreSendDecision, SuccessCallback};
use crate::interceptor::DispatchInterceptor;
use crate::options::RequestOptions;
use crate::transport::{Response, Transport};

pub(crate) struct Invocation {
    pub request: RequestOptions,
    pub decision: PreSendDecision,
    pub hooks: HookSet,
    pub interceptors: Vec<Arc<dyn DispatchInterceptor>>,
    pub transport: Arc<dyn Transport>,
    pub success: Option<SuccessCallback>,
    pub error: Option<ErrorCallback>,
}

impl Invocation {
    pub async fn run(self) -> Result<Response, DispatchError> {
        let Self {
            mut request,
            decision,
            hooks,
            interceptors,
            transport,
            success,
            error,
        } = self;

        let raw = match decision {
            PreSendDecision::Substitute(body) => {
                tracing::debug!(target: "backend_api::dispatch", endpoint=%request.endpoint, request_id=%request.request_id, "pre-send hook substituted the result");
                Ok(Response::substituted(body))
            }
            PreSendDecision::Send => send(&mut request, &interceptors, transport.as_ref()).await,
        };

        let outcome = raw.and_then(|resp| hooks.process(resp, &request));

        match &outcome {
            Ok(resp) => {
                tracing::debug!(target: "backend_api::dispatch", endpoint=%request.endpoint, request_id=%request.request_id, "delivering success");
                if let Some(cb) = success {
                    cb(&request, resp);
                }
            }
            Err(err) => {
                tracing::debug!(target: "backend_api::dispatch", endpoint=%request.endpoint, request_id=%request.request_id, reason=%err.reason(), err=%err, "delivering error");
                for it in &interceptors {
                    it.on_error(&request, err);
                }
                if let Some(handler) = &hooks.error_handler {
                    handler(&request, err);
                }
                if let Some(cb) = error {
                    cb(&request, err);
                }
            }
        }

        outcome
    }
}

async fn send(
    request: &mut RequestOptions,
    interceptors: &[Arc<dyn DispatchInterceptor>],
    transport: &dyn Transport,
) -> Result<Response, DispatchError> {
    for it in interceptors {
        it.on_before_send(request)?;
    }
    let resp = transport.send(request).await?;
    for it in interceptors {
        it.on_response(request, &resp);
    }
    Ok(resp)
}
