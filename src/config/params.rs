//! Action parameters supplied as YAML text.
//!
//! Accepts either plain parameter mappings:
//!
//! ```yaml
//! entry_id: 01KAEWT06A1R2N0CA0YX9V2ZMK
//! include_level: true
//! ```
//!
//! or a full action document as copied from developer tooling, whose `data:`
//! section becomes the parameters:
//!
//! ```yaml
//! action: tibber_prices.get_chartdata
//! data:
//!   entry_id: 01KAEWT06A1R2N0CA0YX9V2ZMK
//! ```

use serde_yaml::Value as Yaml;

use crate::core::BridgeError;
use crate::util::serde::Payload;

/// Parameters extracted from YAML text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedParameters {
    /// Parameter mapping passed to the action.
    pub parameters: Payload,
    /// Action named inside the document (`action:` or legacy `service:`).
    pub action: Option<String>,
}

/// Parse YAML action parameters.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidParameters`] for YAML syntax errors, a
/// non-mapping document, a non-mapping `data:` section, or keys that cannot
/// be represented as strings.
pub fn parse_parameters(text: &str) -> Result<ParsedParameters, BridgeError> {
    if text.trim().is_empty() {
        return Ok(empty());
    }

    let doc: Yaml = serde_yaml::from_str(text)
        .map_err(|e| BridgeError::InvalidParameters(format!("yaml parse error: {e}")))?;

    let mapping = match doc {
        Yaml::Null => return Ok(empty()),
        Yaml::Mapping(mapping) => mapping,
        _ => {
            return Err(BridgeError::InvalidParameters(
                "parameters must be a mapping".into(),
            ))
        }
    };

    let action_key = Yaml::from("action");
    let service_key = Yaml::from("service");
    if !mapping.contains_key(&action_key) && !mapping.contains_key(&service_key) {
        return Ok(ParsedParameters {
            parameters: to_payload(Yaml::Mapping(mapping))?,
            action: None,
        });
    }

    let action = [&action_key, &service_key]
        .into_iter()
        .filter_map(|key| mapping.get(key).and_then(Yaml::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(ToOwned::to_owned);

    let parameters = match mapping.get(Yaml::from("data")) {
        None | Some(Yaml::Null) => Payload::Object(serde_json::Map::new()),
        Some(data @ Yaml::Mapping(_)) => to_payload(data.clone())?,
        Some(_) => {
            return Err(BridgeError::InvalidParameters(
                "data section must be a mapping".into(),
            ))
        }
    };

    Ok(ParsedParameters { parameters, action })
}

fn empty() -> ParsedParameters {
    ParsedParameters {
        parameters: Payload::Object(serde_json::Map::new()),
        action: None,
    }
}

fn to_payload(yaml: Yaml) -> Result<Payload, BridgeError> {
    serde_json::to_value(yaml).map_err(|e| BridgeError::InvalidParameters(e.to_string()))
}
