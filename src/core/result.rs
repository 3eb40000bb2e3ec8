//! Materialized invocation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::InvocationError;
use crate::util::clock::now;
use crate::util::serde::{ActionId, Payload};

/// Status of the most recent materialized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// The last invocation returned a payload.
    Ok,
    /// The last invocation failed.
    Error,
    /// No invocation has completed yet.
    Unknown,
}

impl ResultStatus {
    /// Stable state vocabulary exposed to renderers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

/// Coarse classification of a failure, derived from its message text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Likely to clear on its own (timeouts, connectivity, rate limits).
    Temporary,
    /// Needs operator attention (missing action, bad credentials, bad input).
    Permanent,
    /// No indicator matched.
    Unknown,
}

const PERMANENT_INDICATORS: &[&str] = &[
    "not found",
    "does not exist",
    "invalid",
    "unauthorized",
    "forbidden",
    "not supported",
    "permission denied",
    "authentication failed",
    "invalid api key",
    "missing required",
];

const TEMPORARY_INDICATORS: &[&str] = &[
    "timeout",
    "timed out",
    "temporarily",
    "unavailable",
    "connection",
    "network",
    "busy",
    "rate limit",
    "too many requests",
    "server error",
    "503",
    "502",
    "504",
    "retry",
];

impl ErrorKind {
    /// Classify a failure message. Permanent indicators win over temporary ones.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if PERMANENT_INDICATORS.iter().any(|i| lowered.contains(i)) {
            return Self::Permanent;
        }
        if TEMPORARY_INDICATORS.iter().any(|i| lowered.contains(i)) {
            return Self::Temporary;
        }
        Self::Unknown
    }
}

/// Immutable snapshot of one instance's latest observation.
///
/// Constructed only through [`PollResult::unknown`], [`PollResult::ok`] and
/// [`PollResult::error`], which keeps `payload` and `error_message` mutually
/// exclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollResult {
    status: ResultStatus,
    payload: Option<Payload>,
    error_message: Option<String>,
    error_kind: Option<ErrorKind>,
    action_id: ActionId,
    observed_at: DateTime<Utc>,
}

impl PollResult {
    /// Initial value before any invocation completed.
    #[must_use]
    pub fn unknown(action_id: ActionId) -> Self {
        Self {
            status: ResultStatus::Unknown,
            payload: None,
            error_message: None,
            error_kind: None,
            action_id,
            observed_at: now(),
        }
    }

    /// Result of a successful invocation.
    #[must_use]
    pub fn ok(action_id: ActionId, payload: Payload, observed_at: DateTime<Utc>) -> Self {
        Self {
            status: ResultStatus::Ok,
            payload: Some(payload),
            error_message: None,
            error_kind: None,
            action_id,
            observed_at,
        }
    }

    /// Result of a failed invocation. Any earlier payload is gone.
    #[must_use]
    pub fn error(action_id: ActionId, message: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        let message = message.into();
        Self {
            status: ResultStatus::Error,
            payload: None,
            error_kind: Some(ErrorKind::classify(&message)),
            error_message: Some(message),
            action_id,
            observed_at,
        }
    }

    /// Map an invocation outcome to a result stamped at `observed_at`.
    #[must_use]
    pub fn from_outcome(
        action_id: ActionId,
        outcome: Result<Payload, InvocationError>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        match outcome {
            Ok(payload) => Self::ok(action_id, payload, observed_at),
            Err(err) => Self::error(action_id, err.reason(), observed_at),
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> ResultStatus {
        self.status
    }

    /// Response payload, present only when status is [`ResultStatus::Ok`].
    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Failure reason, present only when status is [`ResultStatus::Error`].
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Failure classification, present only when status is [`ResultStatus::Error`].
    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    /// Action that produced this result.
    #[must_use]
    pub const fn action_id(&self) -> &ActionId {
        &self.action_id
    }

    /// When this result was produced.
    #[must_use]
    pub const fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// True for a result produced by a successful invocation.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }
}
