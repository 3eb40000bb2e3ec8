//! Tests for error types

use prometheus_service_result::core::{AppResult, BridgeError, ErrorKind, InvocationError};
use prometheus_service_result::util::InstanceId;

#[test]
fn test_config_validation_error() {
    let err = BridgeError::ConfigValidation("interval too small".to_string());
    assert_eq!(format!("{}", err), "invalid configuration: interval too small");
}

#[test]
fn test_invalid_parameters_error() {
    let err = BridgeError::InvalidParameters("parameters must be a mapping".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid parameters: parameters must be a mapping"
    );
}

#[test]
fn test_not_found_error() {
    let id = InstanceId::new();
    let err = BridgeError::NotFound(id);
    assert_eq!(format!("{}", err), format!("instance not found: {id}"));
}

#[test]
fn test_backend_error() {
    let err = BridgeError::Backend("no tokio runtime".to_string());
    assert_eq!(format!("{}", err), "backend error: no tokio runtime");
}

#[test]
fn test_invocation_error_from_anyhow() {
    fn fetch() -> AppResult<()> {
        anyhow::bail!("upstream returned 503")
    }

    let err: InvocationError = fetch().unwrap_err().into();
    assert_eq!(err.reason(), "upstream returned 503");
    assert_eq!(format!("{}", err), "upstream returned 503");
    assert_eq!(ErrorKind::classify(err.reason()), ErrorKind::Temporary);
}

#[test]
fn test_error_classification() {
    assert_eq!(ErrorKind::classify("Service call timed out"), ErrorKind::Temporary);
    assert_eq!(ErrorKind::classify("Connection refused"), ErrorKind::Temporary);
    assert_eq!(ErrorKind::classify("Too Many Requests"), ErrorKind::Temporary);
    assert_eq!(ErrorKind::classify("Action x.y not found"), ErrorKind::Permanent);
    assert_eq!(ErrorKind::classify("401 Unauthorized"), ErrorKind::Permanent);
    assert_eq!(ErrorKind::classify("something odd"), ErrorKind::Unknown);
}

#[test]
fn test_permanent_wins_over_temporary() {
    // Both "invalid" and "connection" match.
    assert_eq!(
        ErrorKind::classify("invalid connection string"),
        ErrorKind::Permanent
    );
}

#[test]
fn test_invocation_error_keeps_cause_chain() {
    use anyhow::Context;

    fn connect() -> AppResult<()> {
        Err(anyhow::anyhow!("connection refused")).context("fetching forecast")
    }

    let err: InvocationError = connect().unwrap_err().into();
    assert_eq!(err.reason(), "fetching forecast: connection refused");
    assert_eq!(ErrorKind::classify(err.reason()), ErrorKind::Temporary);
}
