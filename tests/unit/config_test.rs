//! Tests for configuration validation

use prometheus_service_result::config::{
    BridgeConfig, PollConfig, SupervisorConfig, DEFAULT_INTERVAL_SECS, MAX_INTERVAL_SECS,
    MIN_INTERVAL_SECS,
};
use prometheus_service_result::core::BridgeError;
use serde_json::json;

fn poll(interval: u64) -> PollConfig {
    PollConfig::new("todo.get_items".parse().unwrap(), json!({}), interval)
}

#[test]
fn test_supervisor_config_defaults() {
    let cfg = SupervisorConfig::default();
    assert_eq!(cfg.min_interval_secs, 10);
    assert_eq!(cfg.max_interval_secs, 86_400);
    assert_eq!(cfg.default_interval_secs, 300);
    assert_eq!(cfg.invocation_timeout_secs, 30);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_supervisor_config_invalid_bounds() {
    let inverted = SupervisorConfig {
        min_interval_secs: 100,
        max_interval_secs: 50,
        ..SupervisorConfig::default()
    };
    assert!(inverted.validate().is_err());

    let zero_timeout = SupervisorConfig {
        invocation_timeout_secs: 0,
        ..SupervisorConfig::default()
    };
    assert!(zero_timeout.validate().is_err());

    let default_out_of_bounds = SupervisorConfig {
        default_interval_secs: 5,
        ..SupervisorConfig::default()
    };
    assert!(default_out_of_bounds.validate().is_err());
}

#[test]
fn test_supervisor_config_from_json_partial() {
    let cfg = SupervisorConfig::from_json_str(r#"{"invocation_timeout_secs": 5}"#).unwrap();
    assert_eq!(cfg.invocation_timeout_secs, 5);
    assert_eq!(cfg.min_interval_secs, MIN_INTERVAL_SECS);
}

#[test]
fn test_interval_bounds_inclusive() {
    let bounds = SupervisorConfig::default();
    assert!(poll(MIN_INTERVAL_SECS).validate(&bounds).is_ok());
    assert!(poll(MAX_INTERVAL_SECS).validate(&bounds).is_ok());
    assert!(matches!(
        poll(MIN_INTERVAL_SECS - 1).validate(&bounds),
        Err(BridgeError::ConfigValidation(_))
    ));
    assert!(matches!(
        poll(MAX_INTERVAL_SECS + 1).validate(&bounds),
        Err(BridgeError::ConfigValidation(_))
    ));
}

#[test]
fn test_parameters_must_be_mapping() {
    let cfg = PollConfig::new("todo.get_items".parse().unwrap(), json!([1, 2]), 60);
    assert!(matches!(
        cfg.validate(&SupervisorConfig::default()),
        Err(BridgeError::InvalidParameters(_))
    ));
}

#[test]
fn test_from_setup_with_explicit_action() {
    let cfg = PollConfig::from_setup(
        Some("weather.get_forecasts"),
        "entity_id: weather.home\ntype: daily\n",
        Some(600),
        &SupervisorConfig::default(),
    )
    .unwrap();
    assert_eq!(cfg.action_id.to_string(), "weather.get_forecasts");
    assert_eq!(cfg.parameters, json!({"entity_id": "weather.home", "type": "daily"}));
    assert_eq!(cfg.interval_seconds, 600);
}

#[test]
fn test_from_setup_takes_action_from_document() {
    let cfg = PollConfig::from_setup(
        None,
        "action: tibber_prices.get_chartdata\ndata:\n  entry_id: abc\n",
        None,
        &SupervisorConfig::default(),
    )
    .unwrap();
    assert_eq!(cfg.action_id.to_string(), "tibber_prices.get_chartdata");
    assert_eq!(cfg.parameters, json!({"entry_id": "abc"}));
    assert_eq!(cfg.interval_seconds, DEFAULT_INTERVAL_SECS);
}

#[test]
fn test_from_setup_errors() {
    let bounds = SupervisorConfig::default();
    assert!(matches!(
        PollConfig::from_setup(None, "entity_id: x\n", None, &bounds),
        Err(BridgeError::ConfigValidation(_))
    ));
    assert!(matches!(
        PollConfig::from_setup(Some("a.b"), "key: [unclosed", None, &bounds),
        Err(BridgeError::InvalidParameters(_))
    ));
    assert!(matches!(
        PollConfig::from_setup(Some("a.b"), "", Some(5), &bounds),
        Err(BridgeError::ConfigValidation(_))
    ));
}

#[test]
fn test_requires_restart() {
    let base = poll(60);
    assert!(!base.requires_restart(&base.with_interval(120)));
    assert!(!base.requires_restart(&base));

    let mut other_params = base.clone();
    other_params.parameters = json!({"list": "shopping"});
    assert!(base.requires_restart(&other_params));

    let mut other_action = base.clone();
    other_action.action_id = "todo.get_lists".parse().unwrap();
    assert!(base.requires_restart(&other_action));
}

#[test]
fn test_bridge_config_from_json() {
    let cfg = BridgeConfig::from_json_str(
        r#"{
            "supervisor": {"invocation_timeout_secs": 10},
            "instances": {
                "forecast": {
                    "action_id": "weather.get_forecasts",
                    "parameters": {"type": "hourly"},
                    "interval_seconds": 900
                },
                "todo": {"action_id": "todo.get_items"}
            }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.instances.len(), 2);
    assert_eq!(cfg.instances["todo"].interval_seconds, DEFAULT_INTERVAL_SECS);
    assert_eq!(cfg.instances["todo"].parameters, json!({}));
    assert_eq!(cfg.supervisor.invocation_timeout_secs, 10);
}

#[test]
fn test_bridge_config_rejects_bad_instance() {
    let err = BridgeConfig::from_json_str(
        r#"{"instances": {"fast": {"action_id": "a.b", "interval_seconds": 1}}}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("fast"));

    assert!(BridgeConfig::from_json_str(r#"{"instances": {"x": {"action_id": "nodot"}}}"#).is_err());
}

#[test]
fn test_supervisor_config_from_env() {
    std::env::set_var("SERVICE_RESULT_INVOCATION_TIMEOUT_SECS", "7");
    std::env::set_var("SERVICE_RESULT_DEFAULT_INTERVAL_SECS", "120");
    let cfg = SupervisorConfig::from_env().unwrap();
    assert_eq!(cfg.invocation_timeout_secs, 7);
    assert_eq!(cfg.default_interval_secs, 120);
    assert_eq!(cfg.max_interval_secs, MAX_INTERVAL_SECS);

    std::env::set_var("SERVICE_RESULT_INVOCATION_TIMEOUT_SECS", "soon");
    assert!(SupervisorConfig::from_env().is_err());

    std::env::remove_var("SERVICE_RESULT_INVOCATION_TIMEOUT_SECS");
    std::env::remove_var("SERVICE_RESULT_DEFAULT_INTERVAL_SECS");
}
