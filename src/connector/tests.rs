//! Tests for the connector module

use super::*;
use crate::codec::CodecConfig;
use std::time::Duration;

#[test]
fn test_connector_default() {
    let connector = Connector::default();
    assert!(connector.endpoint.is_empty());
    assert_eq!(connector.auth, AuthMode::None);
    assert_eq!(connector.timeout, Duration::from_secs(30));
    assert!(!connector.insecure_skip_verify);
    assert!(connector.user_agent.starts_with("anyclient/"));
    assert!(connector.codec.drop_nulls);
}

#[test]
fn test_connector_builder() {
    let connector = Connector::builder()
        .endpoint("https://svc.example/api")
        .auth(AuthMode::Bearer)
        .token("abc")
        .credentials("user", "pass")
        .header("X-Custom", "value")
        .header("X-Custom", "second")
        .body_property("tenant", "acme")
        .timeout(Duration::from_secs(5))
        .user_agent("test-agent/1.0")
        .codec(CodecConfig { drop_nulls: false })
        .build();

    assert_eq!(connector.endpoint, "https://svc.example/api");
    assert_eq!(connector.auth, AuthMode::Bearer);
    assert_eq!(connector.token.as_deref(), Some("abc"));
    assert_eq!(connector.username.as_deref(), Some("user"));
    assert_eq!(connector.password.as_deref(), Some("pass"));
    // Duplicate header names are kept, both are sent
    assert_eq!(connector.headers.len(), 2);
    assert_eq!(connector.body_properties.len(), 1);
    assert_eq!(connector.timeout, Duration::from_secs(5));
    assert_eq!(connector.user_agent, "test-agent/1.0");
    assert!(!connector.codec.drop_nulls);
}

#[test]
fn test_validate_requires_endpoint() {
    let connector = Connector::default();
    let err = connector.validate().unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn test_validate_requires_positive_timeout() {
    let connector = Connector::builder()
        .endpoint("https://svc.example")
        .timeout(Duration::ZERO)
        .build();
    let err = connector.validate().unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn test_validate_ok() {
    let connector = Connector::builder().endpoint("https://svc.example").build();
    assert!(connector.validate().is_ok());
}

#[test]
fn test_auth_mode_default() {
    assert_eq!(AuthMode::default(), AuthMode::None);
}

#[test]
fn test_auth_mode_serde() {
    let mode: AuthMode = serde_json::from_str("\"bearer\"").unwrap();
    assert_eq!(mode, AuthMode::Bearer);

    let json = serde_json::to_string(&AuthMode::Basic).unwrap();
    assert_eq!(json, "\"basic\"");
}
