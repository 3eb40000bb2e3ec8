//! Presentation-facing models: state scalar, attribute bundle, diagnostics.
//!
//! Field names and the `ok`/`error` vocabulary are relied on by external
//! renderers and templates. Add fields freely; never rename existing ones.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::PollConfig;
use crate::core::{ErrorKind, InstanceStats, PollResult, ResultStatus};
use crate::util::serde::{InstanceId, Payload};

/// Parameter keys whose values never appear in diagnostics.
pub const REDACTED_KEYS: &[&str] = &["password", "api_key", "token", "secret"];

const REDACTED: &str = "**REDACTED**";

/// Attribute bundle published alongside the state scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attributes {
    /// Response payload of the last successful call, `null` otherwise.
    pub data: Option<Payload>,
    /// Invoked action, `domain.name`.
    pub service: String,
    /// When the current result was produced; absent before the first call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    /// Whether the last call succeeded.
    pub success: bool,
    /// Failure reason of the last call, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Classification of the failure, if the last call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
}

impl Attributes {
    /// Render the attribute bundle for `result`.
    #[must_use]
    pub fn from_result(result: &PollResult) -> Self {
        let completed = result.status() != ResultStatus::Unknown;
        Self {
            data: result.payload().cloned(),
            service: result.action_id().to_string(),
            last_update: completed.then(|| result.observed_at()),
            success: result.is_ok(),
            error_message: result.error_message().map(ToOwned::to_owned),
            error_type: result.error_kind(),
        }
    }
}

/// State scalar for `result`: `ok`, `error`, or `unknown` before the first
/// completed call.
#[must_use]
pub const fn state(result: &PollResult) -> &'static str {
    result.status().as_str()
}

/// Configuration as shown in diagnostics, with sensitive values redacted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedactedConfig {
    /// Invoked action.
    pub action_id: String,
    /// Parameters with sensitive values replaced.
    pub parameters: Payload,
    /// Configured interval.
    pub interval_seconds: u64,
}

/// Diagnostics snapshot for one instance.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// Instance identifier.
    pub instance_id: InstanceId,
    /// Active configuration, redacted.
    pub config: RedactedConfig,
    /// Interval the scheduler is currently using.
    pub effective_interval_seconds: u64,
    /// Current state scalar.
    pub state: &'static str,
    /// Whether the current result carries a payload. The payload itself is
    /// not included.
    pub has_payload: bool,
    /// When the current result was produced; `None` before the first
    /// completed call.
    pub last_update: Option<DateTime<Utc>>,
    /// Failure reason of the current result, if any.
    pub last_error: Option<String>,
    /// Whether an invocation is outstanding right now.
    pub in_flight: bool,
    /// Polling statistics.
    pub stats: InstanceStats,
}

impl Diagnostics {
    pub(crate) fn build(
        instance_id: InstanceId,
        config: &PollConfig,
        effective_interval_seconds: u64,
        result: &PollResult,
        in_flight: bool,
        stats: InstanceStats,
    ) -> Self {
        Self {
            instance_id,
            config: RedactedConfig {
                action_id: config.action_id.to_string(),
                parameters: redact(&config.parameters),
                interval_seconds: config.interval_seconds,
            },
            effective_interval_seconds,
            state: state(result),
            has_payload: result.payload().is_some(),
            last_update: (result.status() != ResultStatus::Unknown)
                .then(|| result.observed_at()),
            last_error: result.error_message().map(ToOwned::to_owned),
            in_flight,
            stats,
        }
    }
}

/// Copy of `value` with the values of [`REDACTED_KEYS`] replaced at any depth.
#[must_use]
pub fn redact(value: &Payload) -> Payload {
    match value {
        Payload::Object(map) => Payload::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if REDACTED_KEYS.contains(&k.to_lowercase().as_str()) {
                        Payload::String(REDACTED.into())
                    } else {
                        redact(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Payload::Array(items) => Payload::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}
