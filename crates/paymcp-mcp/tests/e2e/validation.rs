//! Argument validation through `tools/call`.

use crate::common::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_missing_required_parameter() {
    let client = Arc::new(RecordingClient::new("rzp_test_default"));
    let server = single_tenant(client.clone(), false);

    let response = call_tool(&server, "create_thing", json!({"amount": 100})).await;

    assert!(is_tool_error(&response));
    assert_eq!(result_text(&response), "missing required parameter: currency");
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_every_failure_reported() {
    let client = Arc::new(RecordingClient::new("rzp_test_default"));
    let server = single_tenant(client.clone(), false);

    let response = call_tool(
        &server,
        "create_thing",
        json!({"amount": "100", "receipt": ["r"]}),
    )
    .await;

    assert!(is_tool_error(&response));
    assert_eq!(
        result_text(&response),
        "Validation errors:\n\
         - invalid parameter type: amount\n\
         - missing required parameter: currency\n\
         - invalid parameter type: receipt"
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_arguments_may_be_omitted() {
    let server = single_tenant(Arc::new(RecordingClient::new("k")), false);
    let response = send(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "fetch_thing"}
        }),
    )
    .await
    .unwrap();

    assert!(is_tool_error(&response));
    assert_eq!(result_text(&response), "missing required parameter: thing_id");
}

#[tokio::test]
async fn test_empty_optional_not_forwarded() {
    let client = Arc::new(RecordingClient::new("rzp_test_default"));
    let server = single_tenant(client.clone(), false);

    let response = call_tool(
        &server,
        "create_thing",
        json!({"amount": 5000.0, "currency": "INR", "receipt": ""}),
    )
    .await;

    assert!(!is_tool_error(&response), "{response}");
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].payload["amount"], 5000);
    assert_eq!(calls[0].payload["currency"], "INR");
    assert!(!calls[0].payload.contains_key("receipt"));
}

#[tokio::test]
async fn test_advertised_minimum_is_not_enforced_locally() {
    let client = Arc::new(RecordingClient::new("rzp_test_default"));
    let server = single_tenant(client.clone(), false);

    let response = call_tool(&server, "create_thing", json!({"amount": 1, "currency": "INR"})).await;

    assert!(!is_tool_error(&response));
    assert_eq!(client.calls()[0].payload["amount"], 1);
}
