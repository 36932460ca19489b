//! Delivery modes and the handles returned by `invoke`.
//!
//! Both modes run the invocation on a spawned task, so per-call callbacks
//! never run inside the `invoke` call itself. They differ in what the caller
//! gets back:
//! - [`DeliveryMode::Callback`]: a [`CallbackHandle`] that only signals
//!   completion; results arrive through the per-call callbacks.
//! - [`DeliveryMode::Future`]: a [`ResponseFuture`] resolving to the processed
//!   response or the error. Per-call callbacks, if given, still fire first.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::task::{Context, Poll};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::DispatchError;
use crate::transport::Response;

/// How results reach the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeliveryMode {
    /// Results only reach per-call callbacks.
    Callback,
    /// `invoke` returns an awaitable [`ResponseFuture`].
    #[default]
    Future,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Callback => "callback",
            Self::Future => "future",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"callback"` selects callback delivery; any other value selects futures.
impl FromStr for DeliveryMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.eq_ignore_ascii_case("callback") {
            Self::Callback
        } else {
            Self::Future
        })
    }
}

impl From<String> for DeliveryMode {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(mode) => mode,
            Err(never) => match never {},
        }
    }
}

impl From<DeliveryMode> for String {
    fn from(mode: DeliveryMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Resolves to the processed response of one invocation.
///
/// Dropping it does not cancel the request.
#[must_use = "futures do nothing unless awaited; drop it explicitly to ignore the result"]
pub struct ResponseFuture {
    inner: JoinHandle<Result<Response, DispatchError>>,
}

impl ResponseFuture {
    pub(crate) fn new(inner: JoinHandle<Result<Response, DispatchError>>) -> Self {
        Self { inner }
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Future for ResponseFuture {
    type Output = Result<Response, DispatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner
            .poll_unpin(cx)
            .map(|joined| joined.map_err(DispatchError::from).and_then(|res| res))
    }
}

impl fmt::Debug for ResponseFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseFuture")
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Completion signal of a callback-mode invocation.
pub struct CallbackHandle {
    inner: JoinHandle<()>,
}

impl CallbackHandle {
    pub(crate) fn new(inner: JoinHandle<()>) -> Self {
        Self { inner }
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Future for CallbackHandle {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx).map(|joined| {
            if let Err(e) = joined {
                tracing::warn!(target: "backend_api::dispatch", err=%e, "callback invocation did not complete");
            }
        })
    }
}

impl fmt::Debug for CallbackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// What [`invoke`](crate::RequestDispatcher::invoke) hands back for a known endpoint.
#[derive(Debug)]
pub enum InvocationHandle {
    Callback(CallbackHandle),
    Future(ResponseFuture),
}

impl InvocationHandle {
    pub fn mode(&self) -> DeliveryMode {
        match self {
            Self::Callback(_) => DeliveryMode::Callback,
            Self::Future(_) => DeliveryMode::Future,
        }
    }

    /// The response future, when the dispatcher runs in future mode.
    pub fn into_response(self) -> Option<ResponseFuture> {
        match self {
            Self::Future(fut) => Some(fut),
            Self::Callback(_) => None,
        }
    }

    /// Wait for the invocation to finish. Yields the result in future mode and
    /// `None` in callback mode.
    pub async fn wait(self) -> Option<Result<Response, DispatchError>> {
        match self {
            Self::Future(fut) => Some(fut.await),
            Self::Callback(handle) => {
                handle.await;
                None
            }
        }
    }
}
