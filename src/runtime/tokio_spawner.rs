//! Tokio runtime spawner implementation.

use std::future::Future;

use tokio::runtime::Handle;

use crate::core::{BridgeError, Spawn};

/// Spawner that runs scheduler loops and invocations on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    /// Create a spawner from a tokio runtime handle.
    #[must_use]
    pub const fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Create a spawner bound to the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Backend`] when called outside a tokio runtime.
    pub fn current() -> Result<Self, BridgeError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| BridgeError::Backend(format!("no tokio runtime: {e}")))
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut);
    }
}
