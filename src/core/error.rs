//! Error types for bridge operations.

use thiserror::Error;

use crate::util::serde::InstanceId;

/// Errors surfaced synchronously by configuration and lifecycle operations.
///
/// Invocation failures never appear here: they are absorbed into the
/// published result (see [`InvocationError`]).
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Interval out of bounds, malformed action id or other bad config.
    #[error("invalid configuration: {0}")]
    ConfigValidation(String),
    /// Action parameters could not be parsed or are not a mapping.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// The referenced instance does not exist or was removed.
    #[error("instance not found: {0}")]
    NotFound(InstanceId),
    /// Runtime or environment failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Failure reported by an action invoker.
///
/// Timeouts, remote rejections and transport problems all collapse into this
/// single type; only the rendered reason is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InvocationError {
    reason: String,
}

impl InvocationError {
    /// Create an invocation error from a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The rendered failure reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<anyhow::Error> for InvocationError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
