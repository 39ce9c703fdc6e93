//! Tests for the dispatcher

use super::*;
use crate::connector::{AuthMode, Connector};
use crate::error::Error;
use crate::request::UriRequest;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, PartialEq, Deserialize)]
struct UserDto {
    id: u64,
    name: String,
}

fn service_for(endpoint: impl Into<String>) -> ApiService {
    ApiService::new(Connector::builder().endpoint(endpoint).build())
}

#[tokio::test]
async fn test_get_decodes_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "Ann"})),
        )
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("users").segment("1");
    let user: UserDto = service.get(&request, false).await.unwrap();

    assert_eq!(
        user,
        UserDto {
            id: 1,
            name: "Ann".to_string()
        }
    );
}

#[tokio::test]
async fn test_get_sends_accept_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("data");
    let value: serde_json::Value = service.get(&request, true).await.unwrap();

    assert_eq!(value["ok"], true);
}

#[tokio::test]
async fn test_get_sends_bearer_token_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "Ann"})))
        .mount(&mock_server)
        .await;

    // Token and credentials both set; the token must win
    let connector = Connector::builder()
        .endpoint(mock_server.uri())
        .auth(AuthMode::Bearer)
        .token("abc")
        .credentials("user", "pass")
        .build();

    let service = ApiService::new(connector);
    let request = UriRequest::new().segment("users").segment("1");
    let user: UserDto = service.get(&request, false).await.unwrap();

    assert_eq!(user.id, 1);
}

#[tokio::test]
async fn test_get_sends_basic_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let connector = Connector::builder()
        .endpoint(mock_server.uri())
        .auth(AuthMode::Basic)
        .credentials("user", "pass")
        .build();

    let service = ApiService::new(connector);
    let request = UriRequest::new().segment("secure");
    let text = service.get_text(&request, false).await.unwrap();

    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_get_sends_default_headers_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("X-Tenant", "acme"))
        .and(query_param("q", "rust"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&mock_server)
        .await;

    let connector = Connector::builder()
        .endpoint(mock_server.uri())
        .header("X-Tenant", "acme")
        .build();

    let service = ApiService::new(connector);
    let request = UriRequest::new()
        .segment("search")
        .query("q", "rust")
        .query("page", "1")
        .query("page", "2");
    let value: serde_json::Value = service.get(&request, false).await.unwrap();

    assert!(value["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("blob");
    let bytes = service.get_bytes(&request).await.unwrap();

    assert_eq!(bytes.as_ref(), &[1u8, 2, 3]);
}

#[tokio::test]
async fn test_get_http_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("missing");
    let err = service.get::<UserDto>(&request, false).await.unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "not found");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_decode_failure_is_typed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("garbled");
    let err = service.get::<UserDto>(&request, false).await.unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_get_unit_never_decodes_body() {
    let mock_server = MockServer::start().await;

    // Body is not valid JSON; a unit call must succeed without touching it
    Mock::given(method("GET"))
        .and(path("/fire-and-forget"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("fire-and-forget");
    service.get_unit(&request, false).await.unwrap();
}

#[tokio::test]
async fn test_post_merges_body_properties() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(body_json(json!({"name": "x", "tenant": "acme"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7, "name": "x"})))
        .mount(&mock_server)
        .await;

    let connector = Connector::builder()
        .endpoint(mock_server.uri())
        .body_property("tenant", "acme")
        .build();

    let service = ApiService::new(connector);
    let request = UriRequest::new().segment("items");
    let created: UserDto = service.post(&request, &json!({"name": "x"})).await.unwrap();

    assert_eq!(created.id, 7);
}

#[tokio::test]
async fn test_post_body_property_collision_fails_before_network() {
    let mock_server = MockServer::start().await;

    let connector = Connector::builder()
        .endpoint(mock_server.uri())
        .body_property("tenant", "acme")
        .build();

    let service = ApiService::new(connector);
    let request = UriRequest::new().segment("items");
    let err = service
        .post::<UserDto, _>(&request, &json!({"tenant": "other"}))
        .await
        .unwrap_err();

    assert!(err.is_invalid_request());
    // Nothing was mounted; reaching the server would have produced HttpStatus
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_post_unit_on_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("events");
    service
        .post_unit(&request, &json!({"kind": "ping"}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_or_else_maps_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate"))
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("items");
    let err = service
        .post_or_else::<UserDto, _, _>(&request, &json!({"name": "x"}), |response| {
            Error::Other(format!("conflict ({}): {}", response.status, response.body))
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "conflict (409): duplicate");
}

#[tokio::test]
async fn test_put_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(json!({"name": "Ann"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "Ann"})))
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("users").segment("1");
    let user: UserDto = service.put(&request, &json!({"name": "Ann"})).await.unwrap();

    assert_eq!(user.name, "Ann");
}

#[tokio::test]
async fn test_delete_unit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let service = service_for(mock_server.uri());
    let request = UriRequest::new().segment("users").segment("1");
    service.delete_unit(&request, false).await.unwrap();
}

#[tokio::test]
async fn test_timeout_without_cancellation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let connector = Connector::builder()
        .endpoint(mock_server.uri())
        .timeout(Duration::from_millis(100))
        .build();

    let service = ApiService::new(connector);
    let request = UriRequest::new().segment("slow");
    let err = service.get_unit(&request, false).await.unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }));
}

#[tokio::test]
async fn test_cancellation_wins_over_deadline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let cancel = CancelSignal::new();
    let connector = Connector::builder()
        .endpoint(mock_server.uri())
        .timeout(Duration::from_secs(10))
        .build();

    let service = ApiService::new(connector).with_cancel(cancel.clone());
    let request = UriRequest::new().segment("slow");

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = service.get_unit(&request, false).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled { .. }));
}

#[tokio::test]
async fn test_already_cancelled_signal_short_circuits() {
    let cancel = CancelSignal::new();
    cancel.cancel();

    let connector = Connector::builder()
        .endpoint("https://svc.example")
        .build();
    let service = ApiService::new(connector).with_cancel(cancel);

    let err = service
        .get_unit(&UriRequest::new(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled { .. }));
}

#[tokio::test]
async fn test_empty_endpoint_is_invalid_request() {
    let service = ApiService::new(Connector::default());
    let err = service
        .get::<UserDto>(&UriRequest::new(), false)
        .await
        .unwrap_err();
    assert!(err.is_invalid_request());
}

#[tokio::test]
async fn test_missing_credentials_fail_before_network() {
    let connector = Connector::builder()
        .endpoint("https://svc.example")
        .auth(AuthMode::Bearer)
        .build();
    let service = ApiService::new(connector);

    let err = service
        .get_unit(&UriRequest::new(), false)
        .await
        .unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn test_cancel_signal_state() {
    let signal = CancelSignal::new();
    assert!(!signal.is_cancelled());

    let clone = signal.clone();
    signal.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn test_api_service_debug() {
    let service = service_for("https://svc.example");
    let rendered = format!("{service:?}");
    assert!(rendered.contains("ApiService"));
    assert!(rendered.contains("connector"));
}
