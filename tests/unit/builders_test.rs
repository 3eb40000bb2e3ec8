//! Tests for builder modules

use std::sync::Arc;
use std::time::Duration;

use prometheus_service_result::builders::build_supervisor;
use prometheus_service_result::config::BridgeConfig;
use prometheus_service_result::infra::ActionRegistry;
use prometheus_service_result::runtime::TokioSpawner;
use serde_json::json;

const CONFIG: &str = r#"{
    "instances": {
        "lists": {"action_id": "todo.get_lists", "interval_seconds": 60},
        "items": {"action_id": "todo.get_items", "parameters": {"list": "groceries"}}
    }
}"#;

#[tokio::test(start_paused = true)]
async fn test_build_supervisor_starts_every_instance() {
    let registry = Arc::new(ActionRegistry::new());
    registry.register_fn("todo.get_lists".parse().unwrap(), |_, _| async {
        Ok(json!(["groceries", "chores"]))
    });
    registry.register_fn("todo.get_items".parse().unwrap(), |_, params| async move {
        Ok(json!({"list": params["list"], "items": []}))
    });

    let cfg = BridgeConfig::from_json_str(CONFIG).unwrap();
    let (supervisor, ids) =
        build_supervisor(&cfg, registry, TokioSpawner::current().unwrap()).unwrap();
    assert_eq!(supervisor.len(), 2);

    tokio::time::sleep(Duration::from_millis(10)).await;

    let items = supervisor.get(ids["items"]).unwrap();
    assert_eq!(items.payload(), Some(&json!({"list": "groceries", "items": []})));
    assert_eq!(supervisor.state(ids["lists"]).unwrap(), "ok");
    supervisor.shutdown();
}

#[tokio::test]
async fn test_build_supervisor_rejects_invalid_config() {
    let mut cfg = BridgeConfig::from_json_str(CONFIG).unwrap();
    cfg.supervisor.invocation_timeout_secs = 0;
    let registry = Arc::new(ActionRegistry::new());
    assert!(build_supervisor(&cfg, registry, TokioSpawner::current().unwrap()).is_err());
}
