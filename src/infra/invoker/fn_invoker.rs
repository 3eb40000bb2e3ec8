//! Closure-backed action invoker.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{ActionInvoker, InvocationError};
use crate::util::serde::{ActionId, Payload};

/// Invoker that calls a closure producing a fresh future per call.
///
/// The closure receives owned copies of the action id and parameters so the
/// returned future can be `'static`. Shared state belongs in an explicit
/// `Arc` captured by the closure.
///
/// ```rust,ignore
/// let invoker = FnInvoker::arc(|action, params| async move {
///     Ok(serde_json::json!({ "called": action.to_string(), "with": params }))
/// });
/// ```
pub struct FnInvoker<F> {
    f: F,
}

impl<F> FnInvoker<F> {
    /// Wrap a closure.
    pub const fn new(f: F) -> Self {
        Self { f }
    }

    /// Wrap a closure and return it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> ActionInvoker for FnInvoker<F>
where
    F: Fn(ActionId, Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Payload, InvocationError>> + Send + 'static,
{
    async fn invoke(&self, action: &ActionId, parameters: &Payload) -> Result<Payload, InvocationError> {
        (self.f)(action.clone(), parameters.clone()).await
    }
}
