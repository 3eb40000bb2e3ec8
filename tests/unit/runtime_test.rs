//! Tests for tokio spawner utilities and the presentation API

use prometheus_service_result::core::{PollResult, Spawn};
use prometheus_service_result::runtime::api::REDACTED_KEYS;
use prometheus_service_result::runtime::{redact, state, Attributes, TokioSpawner};
use prometheus_service_result::util::now;
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[test]
fn test_tokio_spawner_outside_runtime() {
    assert!(TokioSpawner::current().is_err());
}

#[test]
fn test_attribute_keys_are_stable() {
    let action = "weather.get_forecasts".parse().unwrap();
    let result = PollResult::ok(action, json!({"forecast": []}), now());
    let attrs = serde_json::to_value(Attributes::from_result(&result)).unwrap();

    let mut keys: Vec<&str> = attrs.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["data", "last_update", "service", "success"]);
    assert_eq!(state(&result), "ok");
}

#[test]
fn test_redact_covers_all_sensitive_keys() {
    let mut params = serde_json::Map::new();
    for key in REDACTED_KEYS {
        params.insert((*key).to_string(), json!("value"));
    }
    params.insert("entity_id".into(), json!("sensor.x"));

    let redacted = redact(&serde_json::Value::Object(params));
    for key in REDACTED_KEYS {
        assert_ne!(redacted[*key], json!("value"));
    }
    assert_eq!(redacted["entity_id"], "sensor.x");
}
