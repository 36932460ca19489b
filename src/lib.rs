//! backend-api
//!
//! A small data layer for talking to a backend through named endpoints.
//!
//! Call sites never build URLs or pick HTTP verbs themselves: they register
//! endpoint descriptors once, then call [`RequestDispatcher::invoke`] by name.
//! Cross-cutting behavior lives in three optional hooks on the dispatcher:
//!
//! - a pre-send hook that may rewrite the request or short-circuit it with a
//!   substitute result,
//! - a result processor that reclassifies a transport-successful payload as a
//!   business success or a business error,
//! - a global error handler that runs before any per-call error callback.
//!
//! Results reach the caller either through per-call callbacks or through an
//! awaitable [`ResponseFuture`], depending on the dispatcher's [`DeliveryMode`].
//!
//! ```rust,ignore
//! use backend_api::{EndpointDescriptor, InvocationOptions, RequestDispatcher};
//!
//! let mut api = RequestDispatcher::builder()
//!     .base_url("https://api.example.com")
//!     .build()?;
//! api.register("getMessageList", EndpointDescriptor::get("/messages"));
//!
//! let handle = api.invoke("getMessageList", InvocationOptions::new());
//! if let Some(resp) = handle.and_then(|h| h.into_response()) {
//!     let messages = resp.await?;
//! }
//! ```
#![deny(unsafe_code)]

pub mod delivery;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod hooks;
pub mod interceptor;
pub mod options;
pub mod transport;

pub use delivery::{CallbackHandle, DeliveryMode, InvocationHandle, ResponseFuture};
pub use dispatcher::{RequestDispatcher, RequestDispatcherBuilder};
pub use endpoint::{EndpointDescriptor, Registry};
pub use error::{BUSINESS_ERROR, DispatchError};
pub use hooks::{ErrorHandler, PreSendDecision, PreSendHook, ProcessedResult, ResultProcessor};
pub use interceptor::{DispatchInterceptor, LoggingInterceptor};
pub use options::{InvocationOptions, RequestOptions, TransportOptions};
pub use reqwest::Method;
pub use transport::{ReqwestTransport, Response, ResponseMeta, Transport, TransportConfig};
