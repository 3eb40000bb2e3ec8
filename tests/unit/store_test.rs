//! Tests for the result store

use std::sync::Arc;
use std::thread;

use prometheus_service_result::core::{PollResult, ResultStatus, ResultStore};
use prometheus_service_result::util::{now, ActionId};
use serde_json::json;

fn action() -> ActionId {
    "sensor.read".parse().unwrap()
}

#[test]
fn test_initial_result_is_unknown() {
    let store = ResultStore::new(PollResult::unknown(action()));
    let current = store.read();
    assert_eq!(current.status(), ResultStatus::Unknown);
    assert!(current.payload().is_none());
    assert!(current.error_message().is_none());
}

#[test]
fn test_concurrent_readers_never_see_torn_results() {
    let store = Arc::new(ResultStore::new(PollResult::unknown(action())));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..1_000 {
                if i % 2 == 0 {
                    store.write(PollResult::ok(action(), json!({ "i": i }), now()));
                } else {
                    store.write(PollResult::error(action(), format!("failure {i}"), now()));
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    let r = store.read();
                    match r.status() {
                        ResultStatus::Ok => {
                            assert!(r.payload().is_some());
                            assert!(r.error_message().is_none());
                        }
                        ResultStatus::Error => {
                            assert!(r.payload().is_none());
                            assert!(r.error_message().is_some());
                        }
                        ResultStatus::Unknown => assert!(r.payload().is_none()),
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.read().error_message(), Some("failure 999"));
}
