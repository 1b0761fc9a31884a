//! Dispatcher tests: envelope, lifecycle and routing.

use crate::common::*;
use paymcp_mcp::{McpServer, TransportCredentials};
use serde_json::{Value, json};
use std::sync::Arc;

fn server() -> McpServer {
    single_tenant(Arc::new(RecordingClient::new("rzp_test_default")), false)
}

async fn raw(server: &McpServer, body: &str) -> Value {
    let response = server
        .handle_message(body.as_bytes(), &TransportCredentials::None)
        .await
        .expect("a response");
    serde_json::to_value(response).unwrap()
}

#[tokio::test]
async fn test_initialize_reports_server_info() {
    let server = server();
    let response = send(
        &server,
        json!({"jsonrpc": "2.0", "id": "init", "method": "initialize", "params": {}}),
    )
    .await
    .unwrap();

    assert_eq!(response["id"], "init");
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], server.info().name);
    assert_eq!(response["result"]["serverInfo"]["version"], server.info().version);
    assert_eq!(server.info().name, "paymcp-test");
    assert_eq!(server.info().version, "1.2.3");
    assert!(response["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_ping() {
    let response = send(&server(), json!({"jsonrpc": "2.0", "id": 9, "method": "ping"}))
        .await
        .unwrap();
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_notification_gets_no_response() {
    let response = send(
        &server(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_parse_error() {
    let response = raw(&server(), "{\"jsonrpc\": \"2.0\",").await;
    assert_eq!(response["error"]["code"], -32700);
    assert_eq!(response["id"], Value::Null);
}

#[tokio::test]
async fn test_invalid_version() {
    let response = raw(&server(), r#"{"jsonrpc":"1.0","id":3,"method":"ping"}"#).await;
    assert_eq!(response["error"]["code"], -32600);
    assert_eq!(response["id"], 3);
}

#[tokio::test]
async fn test_batch_is_invalid_request() {
    let response = raw(
        &server(),
        r#"[{"jsonrpc":"2.0","id":1,"method":"ping"},{"jsonrpc":"2.0","id":2,"method":"ping"}]"#,
    )
    .await;
    assert_eq!(response["error"]["code"], -32600);
}

#[tokio::test]
async fn test_unknown_method() {
    let response = send(&server(), json!({"jsonrpc": "2.0", "id": 4, "method": "resources/list"}))
        .await
        .unwrap();
    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["id"], 4);
}

#[tokio::test]
async fn test_unknown_tool_is_invalid_params() {
    let response = call_tool(&server(), "delete_everything", json!({})).await;
    assert_eq!(response["error"]["code"], -32602);
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_call_without_params() {
    let response = send(&server(), json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call"}))
        .await
        .unwrap();
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_call_with_malformed_params() {
    let response = send(
        &server(),
        json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call", "params": {"name": 12}}),
    )
    .await
    .unwrap();
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_successful_call_returns_backend_document() {
    let client = Arc::new(RecordingClient::new("rzp_test_default"));
    let server = single_tenant(client.clone(), false);

    let response = call_tool(&server, "fetch_thing", json!({"thing_id": "thing_1"})).await;

    assert!(!is_tool_error(&response));
    let document: Value = serde_json::from_str(result_text(&response)).unwrap();
    assert_eq!(document["id"], "thing_1");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "GET");
    assert_eq!(calls[0].path, "/things/thing_1");
}

#[tokio::test]
async fn test_backend_failure_is_tool_error() {
    let client = Arc::new(RecordingClient::failing(
        "rzp_test_default",
        400,
        "The id provided does not exist",
    ));
    let server = single_tenant(client, false);

    let response = call_tool(&server, "fetch_thing", json!({"thing_id": "nope"})).await;

    assert!(response.get("error").is_none());
    assert!(is_tool_error(&response));
    assert_eq!(
        result_text(&response),
        "fetching thing failed: The id provided does not exist"
    );
}

#[tokio::test]
async fn test_multi_tenant_requires_credentials_for_every_method() {
    let server = multi_tenant();

    for method in ["initialize", "ping", "tools/list"] {
        let response = server
            .handle_message(
                json!({"jsonrpc": "2.0", "id": 1, "method": method}).to_string().as_bytes(),
                &TransportCredentials::AuthorizationHeader(None),
            )
            .await
            .map(|r| serde_json::to_value(r).unwrap())
            .unwrap();

        assert_eq!(response["error"]["code"], -32603, "method {method}");
        assert_eq!(response["error"]["message"], "Authentication failed");
    }
}

#[tokio::test]
async fn test_envelope_checked_before_authentication() {
    let server = multi_tenant();
    let response = server
        .handle_message(b"not json", &TransportCredentials::AuthorizationHeader(None))
        .await
        .map(|r| serde_json::to_value(r).unwrap())
        .unwrap();

    assert_eq!(response["error"]["code"], -32700);
}

#[tokio::test]
async fn test_bad_bearer_encoding() {
    let server = multi_tenant();
    let response = server
        .handle_message(
            br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
            &TransportCredentials::AuthorizationHeader(Some("Bearer ***".to_string())),
        )
        .await
        .map(|r| serde_json::to_value(r).unwrap())
        .unwrap();

    assert_eq!(response["error"]["code"], -32603);
    assert_eq!(response["error"]["data"], "invalid token encoding");
}
