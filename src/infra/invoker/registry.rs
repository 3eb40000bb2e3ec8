//! In-memory action dispatcher.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::core::{ActionInvoker, InvocationError};
use crate::infra::invoker::FnInvoker;
use crate::util::serde::{ActionId, Payload};

/// Dispatches invocations to handlers registered per action id.
///
/// Invoking an action with no registered handler fails with
/// `Action <domain.name> not found`, which classifies as a permanent error.
/// Handlers may be registered or removed while instances are polling.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: RwLock<HashMap<ActionId, Arc<dyn ActionInvoker>>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `action`, replacing any previous handler.
    pub fn register(&self, action: ActionId, handler: Arc<dyn ActionInvoker>) {
        debug!(%action, "action handler registered");
        self.handlers.write().insert(action, handler);
    }

    /// Register a closure as the handler for `action`.
    pub fn register_fn<F, Fut>(&self, action: ActionId, f: F)
    where
        F: Fn(ActionId, Payload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Payload, InvocationError>> + Send + 'static,
    {
        self.register(action, FnInvoker::arc(f));
    }

    /// Remove the handler for `action`. Returns whether one was registered.
    pub fn unregister(&self, action: &ActionId) -> bool {
        self.handlers.write().remove(action).is_some()
    }

    /// Whether a handler is registered for `action`.
    #[must_use]
    pub fn has_action(&self, action: &ActionId) -> bool {
        self.handlers.read().contains_key(action)
    }
}

#[async_trait]
impl ActionInvoker for ActionRegistry {
    async fn invoke(&self, action: &ActionId, parameters: &Payload) -> Result<Payload, InvocationError> {
        let handler = self.handlers.read().get(action).cloned();
        match handler {
            Some(handler) => handler.invoke(action, parameters).await,
            None => Err(InvocationError::new(format!("Action {action} not found"))),
        }
    }
}
