//! Dispatcher-wide hooks and per-call callbacks.
//!
//! Each hook kind has a single slot on the dispatcher; setting a new hook
//! replaces the old one. For observers that should stack, use
//! [`DispatchInterceptor`](crate::interceptor::DispatchInterceptor).

use std::sync::Arc;

use crate::endpoint::EndpointDescriptor;
use crate::error::DispatchError;
use crate::options::RequestOptions;
use crate::transport::{Response, ResponseMeta};

/// Outcome of the pre-send hook.
#[derive(Debug, Clone, PartialEq)]
pub enum PreSendDecision {
    /// Issue the transport call with the (possibly rewritten) request.
    Send,
    /// Skip the transport and deliver this value as a successful response.
    Substitute(serde_json::Value),
}

/// Verdict of a result processor on a successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedResult {
    pub success: bool,
    pub result: serde_json::Value,
}

impl ProcessedResult {
    pub fn success(result: serde_json::Value) -> Self {
        Self {
            success: true,
            result,
        }
    }

    pub fn failure(result: serde_json::Value) -> Self {
        Self {
            success: false,
            result,
        }
    }
}

/// Runs before the transport call with `(name, descriptor, request)`.
pub type PreSendHook =
    Arc<dyn Fn(&str, &EndpointDescriptor, &mut RequestOptions) -> PreSendDecision + Send + Sync>;

/// Reclassifies a successful payload. Returning `None` passes it through.
pub type ResultProcessor = Arc<
    dyn Fn(&serde_json::Value, &ResponseMeta, &RequestOptions) -> Option<ProcessedResult>
        + Send
        + Sync,
>;

/// Dispatcher-wide error handler; runs before any per-call error callback.
pub type ErrorHandler = Arc<dyn Fn(&RequestOptions, &DispatchError) + Send + Sync>;

/// Per-call success callback.
pub type SuccessCallback = Box<dyn FnOnce(&RequestOptions, &Response) + Send>;

/// Per-call error callback.
pub type ErrorCallback = Box<dyn FnOnce(&RequestOptions, &DispatchError) + Send>;

/// Wrap a closure as a [`PreSendHook`].
pub fn pre_send_hook<F>(f: F) -> PreSendHook
where
    F: Fn(&str, &EndpointDescriptor, &mut RequestOptions) -> PreSendDecision + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`ResultProcessor`].
pub fn result_processor<F>(f: F) -> ResultProcessor
where
    F: Fn(&serde_json::Value, &ResponseMeta, &RequestOptions) -> Option<ProcessedResult>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an [`ErrorHandler`].
pub fn error_handler<F>(f: F) -> ErrorHandler
where
    F: Fn(&RequestOptions, &DispatchError) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Snapshot of the dispatcher-wide hooks taken at invoke time.
#[derive(Clone, Default)]
pub(crate) struct HookSet {
    pub pre_send: Option<PreSendHook>,
    pub result_processor: Option<ResultProcessor>,
    pub error_handler: Option<ErrorHandler>,
}

impl HookSet {
    /// Apply the result processor to a successful response.
    pub fn process(
        &self,
        response: Response,
        request: &RequestOptions,
    ) -> Result<Response, DispatchError> {
        let Some(processor) = &self.result_processor else {
            return Ok(response);
        };
        match processor(&response.body, &response.meta, request) {
            None => Ok(response),
            Some(ProcessedResult {
                success: true,
                result,
            }) => Ok(Response {
                body: result,
                meta: response.meta,
            }),
            Some(ProcessedResult {
                success: false,
                result,
            }) => Err(DispatchError::business(result)),
        }
    }
}
