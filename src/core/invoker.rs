//! Action invocation contract.

use async_trait::async_trait;

use crate::core::InvocationError;
use crate::util::serde::{ActionId, Payload};

/// Abstraction for calling a named remote action and collecting its response.
///
/// The invoker owns the semantics of the call itself. The polling core only
/// relies on this contract: one call in, one payload or one failure out.
/// Any failure kind (timeout, validation, transport) is reported the same
/// way and ends up as the `error_message` of the published result.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_service_result::core::{ActionInvoker, InvocationError};
/// use prometheus_service_result::util::{ActionId, Payload};
///
/// struct Forecasts;
///
/// #[async_trait]
/// impl ActionInvoker for Forecasts {
///     async fn invoke(&self, action: &ActionId, parameters: &Payload) -> Result<Payload, InvocationError> {
///         Ok(serde_json::json!({ "action": action.to_string(), "echo": parameters }))
///     }
/// }
/// ```
#[async_trait]
pub trait ActionInvoker: Send + Sync + 'static {
    /// Execute `action` with `parameters` and return its structured response.
    ///
    /// # Errors
    ///
    /// Returns an [`InvocationError`] carrying the rendered failure reason.
    async fn invoke(&self, action: &ActionId, parameters: &Payload) -> Result<Payload, InvocationError>;
}
