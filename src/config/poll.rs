//! Supervisor and per-instance poll configuration.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::params::parse_parameters;
use crate::core::BridgeError;
use crate::util::serde::{ActionId, Payload};

/// Smallest accepted poll interval, in seconds.
pub const MIN_INTERVAL_SECS: u64 = 10;
/// Largest accepted poll interval, in seconds (one day).
pub const MAX_INTERVAL_SECS: u64 = 86_400;
/// Interval used when setup does not provide one.
pub const DEFAULT_INTERVAL_SECS: u64 = 300;
/// Upper bound for one action call.
pub const DEFAULT_INVOCATION_TIMEOUT_SECS: u64 = 30;

const ENV_MIN_INTERVAL: &str = "SERVICE_RESULT_MIN_INTERVAL_SECS";
const ENV_MAX_INTERVAL: &str = "SERVICE_RESULT_MAX_INTERVAL_SECS";
const ENV_DEFAULT_INTERVAL: &str = "SERVICE_RESULT_DEFAULT_INTERVAL_SECS";
const ENV_INVOCATION_TIMEOUT: &str = "SERVICE_RESULT_INVOCATION_TIMEOUT_SECS";

/// Settings shared by every instance of a supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Lower interval bound, inclusive.
    pub min_interval_secs: u64,
    /// Upper interval bound, inclusive.
    pub max_interval_secs: u64,
    /// Interval applied when none is configured.
    pub default_interval_secs: u64,
    /// Timeout applied to each action call.
    pub invocation_timeout_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: MIN_INTERVAL_SECS,
            max_interval_secs: MAX_INTERVAL_SECS,
            default_interval_secs: DEFAULT_INTERVAL_SECS,
            invocation_timeout_secs: DEFAULT_INVOCATION_TIMEOUT_SECS,
        }
    }
}

impl SupervisorConfig {
    /// Validate bounds and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigValidation`] describing the first problem.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.min_interval_secs == 0 {
            return Err(invalid("min_interval_secs must be greater than 0"));
        }
        if self.min_interval_secs > self.max_interval_secs {
            return Err(invalid(format!(
                "min_interval_secs ({}) exceeds max_interval_secs ({})",
                self.min_interval_secs, self.max_interval_secs
            )));
        }
        self.check_interval(self.default_interval_secs)
            .map_err(|e| invalid(format!("default_interval_secs: {e}")))?;
        if self.invocation_timeout_secs == 0 {
            return Err(invalid("invocation_timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    /// Check `secs` against the configured bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigValidation`] when `secs` is out of bounds.
    pub fn check_interval(&self, secs: u64) -> Result<(), BridgeError> {
        if secs < self.min_interval_secs || secs > self.max_interval_secs {
            return Err(invalid(format!(
                "interval_seconds must be between {} and {} (got {secs})",
                self.min_interval_secs, self.max_interval_secs
            )));
        }
        Ok(())
    }

    /// Timeout for one action call.
    #[must_use]
    pub const fn invocation_timeout(&self) -> Duration {
        Duration::from_secs(self.invocation_timeout_secs)
    }

    /// Parse supervisor configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigValidation`] on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, BridgeError> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| invalid(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the environment, loading `.env` first when
    /// present. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigValidation`] when a variable is not a
    /// number or the result fails validation.
    pub fn from_env() -> Result<Self, BridgeError> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        if let Some(v) = env_secs(ENV_MIN_INTERVAL)? {
            cfg.min_interval_secs = v;
        }
        if let Some(v) = env_secs(ENV_MAX_INTERVAL)? {
            cfg.max_interval_secs = v;
        }
        if let Some(v) = env_secs(ENV_DEFAULT_INTERVAL)? {
            cfg.default_interval_secs = v;
        }
        if let Some(v) = env_secs(ENV_INVOCATION_TIMEOUT)? {
            cfg.invocation_timeout_secs = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn env_secs(key: &str) -> Result<Option<u64>, BridgeError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| invalid(format!("{key}={raw}: {e}"))),
        Err(_) => Ok(None),
    }
}

fn invalid(msg: impl Into<String>) -> BridgeError {
    BridgeError::ConfigValidation(msg.into())
}

fn empty_parameters() -> Payload {
    Payload::Object(serde_json::Map::new())
}

const fn default_interval_seconds() -> u64 {
    DEFAULT_INTERVAL_SECS
}

/// Configuration of one polling instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Action to invoke, `domain.name`.
    pub action_id: ActionId,
    /// Parameters passed to the action; must be a mapping.
    #[serde(default = "empty_parameters")]
    pub parameters: Payload,
    /// Seconds between invocations.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

impl PollConfig {
    /// Create a config from its parts.
    #[must_use]
    pub const fn new(action_id: ActionId, parameters: Payload, interval_seconds: u64) -> Self {
        Self {
            action_id,
            parameters,
            interval_seconds,
        }
    }

    /// Build a config from raw setup input: an optional action name, YAML
    /// parameter text and an optional interval.
    ///
    /// An action named inside the YAML document is used when `action` is
    /// `None`; otherwise the explicit action wins. A missing interval falls
    /// back to `defaults.default_interval_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidParameters`] for bad YAML and
    /// [`BridgeError::ConfigValidation`] for a missing/malformed action or an
    /// out-of-bounds interval.
    pub fn from_setup(
        action: Option<&str>,
        parameters_yaml: &str,
        interval_seconds: Option<u64>,
        defaults: &SupervisorConfig,
    ) -> Result<Self, BridgeError> {
        let parsed = parse_parameters(parameters_yaml)?;
        let action_id: ActionId = action
            .map(ToOwned::to_owned)
            .or(parsed.action)
            .ok_or_else(|| invalid("no action configured"))?
            .parse()?;
        let cfg = Self::new(
            action_id,
            parsed.parameters,
            interval_seconds.unwrap_or(defaults.default_interval_secs),
        );
        cfg.validate(defaults)?;
        Ok(cfg)
    }

    /// Validate interval bounds and parameter shape.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigValidation`] for an out-of-bounds
    /// interval and [`BridgeError::InvalidParameters`] for non-mapping
    /// parameters.
    pub fn validate(&self, bounds: &SupervisorConfig) -> Result<(), BridgeError> {
        bounds.check_interval(self.interval_seconds)?;
        if !self.parameters.is_object() {
            return Err(BridgeError::InvalidParameters(
                "parameters must be a mapping".into(),
            ));
        }
        Ok(())
    }

    /// Interval as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Copy of this config with a different interval.
    #[must_use]
    pub fn with_interval(&self, interval_seconds: u64) -> Self {
        Self {
            interval_seconds,
            ..self.clone()
        }
    }

    /// Whether switching to `other` needs a full scheduler restart, as
    /// opposed to an interval update.
    #[must_use]
    pub fn requires_restart(&self, other: &Self) -> bool {
        self.action_id != other.action_id || self.parameters != other.parameters
    }
}

/// Root configuration: supervisor settings plus named instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Shared supervisor settings.
    #[serde(default)]
    pub supervisor: SupervisorConfig,
    /// Map of instance name to poll configuration.
    #[serde(default)]
    pub instances: HashMap<String, PollConfig>,
}

impl BridgeConfig {
    /// Validate supervisor settings and every instance.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, prefixed with the instance name.
    pub fn validate(&self) -> Result<(), BridgeError> {
        self.supervisor.validate()?;
        for (name, instance) in &self.instances {
            instance.validate(&self.supervisor).map_err(|e| match e {
                BridgeError::InvalidParameters(msg) => {
                    BridgeError::InvalidParameters(format!("instance `{name}`: {msg}"))
                }
                other => invalid(format!("instance `{name}` invalid: {other}")),
            })?;
        }
        Ok(())
    }

    /// Parse bridge configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigValidation`] on parse failure, or any
    /// validation error.
    pub fn from_json_str(input: &str) -> Result<Self, BridgeError> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| invalid(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
