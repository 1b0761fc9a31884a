//! Shared test infrastructure for paymcp-mcp end-to-end tests.
//!
//! This module provides:
//! - A recording backend client and a factory keyed by credentials
//! - A small server fixture with one read tool, one write tool and `whoami`
//! - Helpers for driving the dispatcher and decoding responses

#![allow(dead_code)]

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use paymcp_client::{ClientError, ClientFactory, Credentials, PaymentsClient};
use paymcp_mcp::{
    Arguments, Authenticator, CallToolResult, McpServer, ParamSpec, ParamValidator, RequestScope,
    ServerInfo, Tool, ToolRegistry, Toolset, ToolsetGroup, TransportCredentials,
};
use serde_json::{Map, Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// BACKEND DOUBLES
// =============================================================================

/// One backend call as seen by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub payload: Map<String, Value>,
}

/// Client that records every call and answers with a fixed document.
pub struct RecordingClient {
    key_id: String,
    calls: Mutex<Vec<RecordedCall>>,
    response: Result<Value, (u16, String)>,
}

impl RecordingClient {
    pub fn new(key_id: &str) -> Self {
        Self {
            key_id: key_id.to_string(),
            calls: Mutex::new(Vec::new()),
            response: Ok(json!({"id": "thing_1", "status": "created"})),
        }
    }

    /// Make every call fail with an API error.
    pub fn failing(key_id: &str, status: u16, description: &str) -> Self {
        Self {
            response: Err((status, description.to_string())),
            ..Self::new(key_id)
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, path: &str, payload: &Map<String, Value>) -> Result<Value, ClientError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            payload: payload.clone(),
        });
        match &self.response {
            Ok(value) => Ok(value.clone()),
            Err((status, description)) => Err(ClientError::Api {
                status: *status,
                code: "BAD_REQUEST_ERROR".to_string(),
                description: description.clone(),
            }),
        }
    }
}

#[async_trait]
impl PaymentsClient for RecordingClient {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn get(&self, path: &str, query: &Map<String, Value>) -> Result<Value, ClientError> {
        self.record("GET", path, query)
    }

    async fn post(&self, path: &str, body: &Map<String, Value>) -> Result<Value, ClientError> {
        self.record("POST", path, body)
    }

    async fn patch(&self, path: &str, body: &Map<String, Value>) -> Result<Value, ClientError> {
        self.record("PATCH", path, body)
    }
}

/// Factory producing a fresh recording client per credentials.
pub struct KeyedFactory;

impl ClientFactory for KeyedFactory {
    fn client_for(&self, credentials: Credentials) -> Result<Arc<dyn PaymentsClient>, ClientError> {
        Ok(Arc::new(RecordingClient::new(&credentials.key_id)))
    }
}

pub fn bearer(key_id: &str, key_secret: &str) -> String {
    format!("Bearer {}", STANDARD.encode(format!("{key_id}:{key_secret}")))
}

// =============================================================================
// TOOL FIXTURES
// =============================================================================

fn fetch_thing() -> Tool {
    Tool::new(
        "fetch_thing",
        "Fetch a thing by id",
        vec![ParamSpec::string("thing_id").required()],
        |scope: RequestScope, args: Arguments| async move {
            let mut v = ParamValidator::new(&args);
            let id = v.path_segment("thing_id");
            if let Err(errors) = v.finish() {
                return errors.into();
            }
            let id = id.unwrap_or_default();
            match scope.client().get(&format!("/things/{id}"), &Map::new()).await {
                Ok(value) => CallToolResult::json(&value),
                Err(e) => CallToolResult::error(format!("fetching thing failed: {e}")),
            }
        },
    )
    .with_title("Fetch thing")
}

fn create_thing() -> Tool {
    Tool::new(
        "create_thing",
        "Create a thing",
        vec![
            ParamSpec::integer("amount").required().minimum(100),
            ParamSpec::string("currency").required(),
            ParamSpec::string("receipt"),
        ],
        |scope: RequestScope, args: Arguments| async move {
            let mut body = Arguments::new();
            let mut v = ParamValidator::new(&args);
            v.required_int(&mut body, "amount")
                .required_string(&mut body, "currency")
                .optional_string(&mut body, "receipt");
            if let Err(errors) = v.finish() {
                return errors.into();
            }
            match scope.client().post("/things", &body).await {
                Ok(value) => CallToolResult::json(&value),
                Err(e) => CallToolResult::error(format!("creating thing failed: {e}")),
            }
        },
    )
}

fn whoami() -> Tool {
    Tool::new(
        "whoami",
        "Report the key id bound to this request",
        vec![ParamSpec::integer("delay_ms")],
        |scope: RequestScope, args: Arguments| async move {
            let delay = args.get("delay_ms").and_then(Value::as_u64).unwrap_or(0);
            let before = scope.client().key_id().to_string();
            tokio::time::sleep(Duration::from_millis(delay)).await;
            tokio::task::yield_now().await;
            let after = scope.client().key_id().to_string();
            if before != after {
                return CallToolResult::error("client changed during the request");
            }
            CallToolResult::text(after)
        },
    )
}

pub fn toolsets(read_only: bool) -> ToolsetGroup {
    let mut group = ToolsetGroup::new(read_only);
    group
        .add_toolset(
            Toolset::new("things", "Thing operations")
                .add_read_tools([fetch_thing(), whoami()])
                .add_write_tools([create_thing()]),
        )
        .unwrap();
    group.enable_toolsets::<&str>(&[]).unwrap();
    group
}

pub fn registry(read_only: bool) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    toolsets(read_only).register_tools(&mut registry).unwrap();
    registry
}

/// Server bound to one fixed client.
pub fn single_tenant(client: Arc<RecordingClient>, read_only: bool) -> McpServer {
    McpServer::new(
        ServerInfo::new("paymcp-test", "1.2.3"),
        registry(read_only),
        Authenticator::new().with_default_client(client),
    )
}

/// Server deriving a client from each request's bearer credentials.
pub fn multi_tenant() -> McpServer {
    McpServer::new(
        ServerInfo::new("paymcp-test", "1.2.3"),
        registry(false),
        Authenticator::new().with_client_factory(Arc::new(KeyedFactory)),
    )
}

// =============================================================================
// DISPATCH HELPERS
// =============================================================================

pub async fn send(server: &McpServer, message: Value) -> Option<Value> {
    let raw = serde_json::to_vec(&message).unwrap();
    server
        .handle_message(&raw, &TransportCredentials::None)
        .await
        .map(|r| serde_json::to_value(r).unwrap())
}

pub async fn call_tool(server: &McpServer, name: &str, arguments: Value) -> Value {
    send(
        server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        }),
    )
    .await
    .unwrap()
}

/// Text of the first content item of a `tools/call` result.
pub fn result_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap_or_default()
}

pub fn is_tool_error(response: &Value) -> bool {
    response["result"]["isError"].as_bool().unwrap_or(false)
}
