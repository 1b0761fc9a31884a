//! Advertised tools and read-only mode.

use crate::common::*;
use serde_json::{Value, json};
use std::sync::Arc;

async fn listed_tools(read_only: bool) -> Vec<Value> {
    let server = single_tenant(Arc::new(RecordingClient::new("k")), read_only);
    let response = send(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
        .await
        .unwrap();
    response["result"]["tools"].as_array().cloned().unwrap_or_default()
}

fn names(tools: &[Value]) -> Vec<&str> {
    tools.iter().filter_map(|t| t["name"].as_str()).collect()
}

#[tokio::test]
async fn test_list_includes_write_tools() {
    let tools = listed_tools(false).await;
    assert_eq!(names(&tools), vec!["create_thing", "fetch_thing", "whoami"]);
}

#[tokio::test]
async fn test_read_only_hides_write_tools() {
    let tools = listed_tools(true).await;
    assert_eq!(names(&tools), vec!["fetch_thing", "whoami"]);
    assert!(tools.iter().all(|t| t["annotations"]["readOnlyHint"] == true));
}

#[tokio::test]
async fn test_read_only_call_to_write_tool_is_unknown() {
    let client = Arc::new(RecordingClient::new("k"));
    let server = single_tenant(client.clone(), true);

    let response = call_tool(&server, "create_thing", json!({"amount": 100, "currency": "INR"})).await;

    assert_eq!(response["error"]["code"], -32602);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_definition_shape() {
    let tools = listed_tools(false).await;
    let create = tools.iter().find(|t| t["name"] == "create_thing").unwrap();

    assert_eq!(create["inputSchema"]["type"], "object");
    assert_eq!(create["inputSchema"]["required"], json!(["amount", "currency"]));
    assert_eq!(create["inputSchema"]["properties"]["amount"]["minimum"], 100);
    assert_eq!(create["annotations"]["readOnlyHint"], false);

    let fetch = tools.iter().find(|t| t["name"] == "fetch_thing").unwrap();
    assert_eq!(fetch["annotations"]["title"], "Fetch thing");
}

#[tokio::test]
async fn test_list_is_stable_across_calls() {
    let server = single_tenant(Arc::new(RecordingClient::new("k")), false);
    let request = json!({"jsonrpc": "2.0", "id": "1", "method": "tools/list"});

    let first = send(&server, request.clone()).await.unwrap();
    let second = send(&server, request).await.unwrap();

    assert!(first.get("error").is_none());
    assert_eq!(first["result"], second["result"]);
    assert_eq!(
        first["result"]["tools"].as_array().map(Vec::len),
        Some(server.tools().len())
    );
}
