//! Tests for utility types

use std::collections::HashSet;

use prometheus_service_result::util::{init_tracing, ActionId, InstanceId};

#[test]
fn test_action_id_parse_and_display() {
    let id: ActionId = "weather.get_forecasts".parse().unwrap();
    assert_eq!(id.domain(), "weather");
    assert_eq!(id.name(), "get_forecasts");
    assert_eq!(id.to_string(), "weather.get_forecasts");
}

#[test]
fn test_action_id_name_may_contain_dots() {
    let id: ActionId = "script.backup.nightly".parse().unwrap();
    assert_eq!(id.domain(), "script");
    assert_eq!(id.name(), "backup.nightly");
}

#[test]
fn test_action_id_rejects_malformed() {
    assert!("nodot".parse::<ActionId>().is_err());
    assert!(".name".parse::<ActionId>().is_err());
    assert!("domain.".parse::<ActionId>().is_err());
    assert!(ActionId::new("a.b", "c").is_err());
}

#[test]
fn test_instance_ids_are_unique() {
    let ids: HashSet<InstanceId> = (0..100).map(|_| InstanceId::new()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!(target: "service_result", "tracing initialized");
}
