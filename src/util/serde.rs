//! Identifier and payload types shared across the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::BridgeError;

/// Arbitrary structured data returned by an action or passed to it.
///
/// The response shape is defined by the called action, so no schema is
/// imposed beyond "null, bool, number, string, sequence or mapping".
pub type Payload = serde_json::Value;

/// Identifier of one supervised polling instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Allocate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fully qualified action name, rendered as `domain.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionId {
    domain: String,
    name: String,
}

impl ActionId {
    /// Build an action id from its two halves.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigValidation`] when either half is empty
    /// or the domain contains a dot.
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Result<Self, BridgeError> {
        let domain = domain.into();
        let name = name.into();
        if domain.trim().is_empty() || name.trim().is_empty() {
            return Err(BridgeError::ConfigValidation(format!(
                "action id `{domain}.{name}` must have a non-empty domain and name"
            )));
        }
        if domain.contains('.') {
            return Err(BridgeError::ConfigValidation(format!(
                "action domain `{domain}` must not contain a dot"
            )));
        }
        Ok(Self { domain, name })
    }

    /// Integration domain that owns the action.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Action name within its domain.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ActionId {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, name) = s.trim().split_once('.').ok_or_else(|| {
            BridgeError::ConfigValidation(format!("action id `{s}` must look like `domain.name`"))
        })?;
        Self::new(domain, name)
    }
}

impl TryFrom<String> for ActionId {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActionId> for String {
    fn from(value: ActionId) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.name)
    }
}
