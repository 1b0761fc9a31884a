//! MCP server implementation.
//!
//! [`McpServer`] owns the frozen tool registry and the authenticator and
//! turns one raw JSON-RPC message into at most one response. Both transports
//! feed messages through [`McpServer::handle_message`], so envelope checks,
//! authentication and routing behave identically over stdio and HTTP.

use crate::auth::{Authenticator, RequestScope, TransportCredentials};
use crate::error::McpError;
use crate::http_transport::HttpServer;
use crate::protocol::*;
use crate::stdio;
use crate::tools::ToolRegistry;
use paymcp_core::{McpConfig, Transport};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// The MCP server.
///
/// Cloning is cheap; clones share the registry and authenticator.
#[derive(Clone)]
pub struct McpServer {
    info: ServerInfo,
    tools: Arc<ToolRegistry>,
    auth: Arc<Authenticator>,
}

impl McpServer {
    pub fn new(info: ServerInfo, tools: ToolRegistry, auth: Authenticator) -> Self {
        Self {
            info,
            tools: Arc::new(tools),
            auth: Arc::new(auth),
        }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Serve on the configured transport until `cancel` fires or the input ends.
    pub async fn run(&self, config: &McpConfig, cancel: CancellationToken) -> Result<(), McpError> {
        match config.transport {
            Transport::Stdio => self.run_stdio(cancel).await,
            Transport::Http => self.run_http(&config.bind_address(), cancel).await,
        }
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout.
    pub async fn run_stdio(&self, cancel: CancellationToken) -> Result<(), McpError> {
        tracing::info!(transport = "stdio", tools = self.tools.len(), "Starting MCP server");
        stdio::serve(self, tokio::io::stdin(), tokio::io::stdout(), cancel).await
    }

    /// Serve JSON-RPC over HTTP POST on `addr`.
    pub async fn run_http(&self, addr: &str, cancel: CancellationToken) -> Result<(), McpError> {
        tracing::info!(
            transport = "http",
            address = addr,
            tools = self.tools.len(),
            "Starting MCP server"
        );
        HttpServer::new(addr, self.clone()).run(cancel).await
    }

    /// Handle one raw message.
    ///
    /// Returns `None` when no response must be sent (notifications).
    pub async fn handle_message(
        &self,
        raw: &[u8],
        credentials: &TransportCredentials,
    ) -> Option<JsonRpcResponse> {
        let request = match parse_envelope(raw) {
            Ok(request) => request,
            Err(response) => return Some(response),
        };

        let scope = match self.auth.authenticate(credentials) {
            Ok(scope) => scope,
            Err(e) => {
                tracing::warn!(method = %request.method, error = %e, "Authentication failed");
                if request.is_notification() {
                    return None;
                }
                return Some(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::authentication_failed(e.to_string()),
                ));
            }
        };

        if request.is_notification() {
            tracing::debug!(method = %request.method, "Received notification");
            return None;
        }

        let span = tracing::info_span!(
            "rpc",
            method = %request.method,
            request_id = %scope.request_id()
        );
        let response = self.handle_request(request, &scope).instrument(span).await;
        if response.is_error() {
            tracing::debug!(request_id = %scope.request_id(), "Request answered with a JSON-RPC error");
        }
        Some(response)
    }

    /// Route an authenticated request.
    pub async fn handle_request(&self, request: JsonRpcRequest, scope: &RequestScope) -> JsonRpcResponse {
        let id = request.id.clone();

        if request.jsonrpc != JSONRPC_VERSION {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_request());
        }

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params, scope).await,
            other => {
                tracing::debug!(method = other, "Unknown method");
                JsonRpcResponse::error(id, JsonRpcError::method_not_found(other))
            }
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: self.info.clone(),
            capabilities: json!({
                "tools": {
                    "listChanged": false
                }
            }),
        };
        to_response(id, &result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResult {
            tools: self.tools.definitions(),
        };
        to_response(id, &result)
    }

    async fn handle_call_tool(
        &self,
        id: Option<Value>,
        params: Option<Value>,
        scope: &RequestScope,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => return JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string())),
            },
            None => return JsonRpcResponse::error(id, JsonRpcError::invalid_params("missing params")),
        };

        let Some(tool) = self.tools.get(&params.name) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("tool {} not found", params.name)),
            );
        };

        let arguments = params.arguments.unwrap_or_default();
        let span = tracing::info_span!(
            "tool_call",
            tool = %params.name,
            key_id = %scope.client().key_id()
        );
        let result = tool.invoke(scope, &arguments).instrument(span).await;

        if result.is_error {
            tracing::info!(tool = %params.name, "Tool returned an error result");
        } else {
            tracing::debug!(tool = %params.name, "Tool call completed");
        }

        to_response(id, &result)
    }
}

fn to_response<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal(e.to_string())),
    }
}

/// Parse and check the JSON-RPC envelope.
///
/// Only single request objects are accepted; batches are rejected as
/// invalid requests.
fn parse_envelope(raw: &[u8]) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string())))?;

    let Value::Object(mut object) = value else {
        return Err(JsonRpcResponse::error(None, JsonRpcError::invalid_request()));
    };

    let id = object.remove("id");
    if matches!(id, Some(Value::Bool(_) | Value::Array(_) | Value::Object(_))) {
        return Err(JsonRpcResponse::error(None, JsonRpcError::invalid_request()));
    }

    let invalid = |id: Option<Value>| JsonRpcResponse::error(id, JsonRpcError::invalid_request());

    match object.get("jsonrpc") {
        Some(Value::String(v)) if v == JSONRPC_VERSION => {}
        _ => return Err(invalid(id)),
    }
    let method = match object.remove("method") {
        Some(Value::String(method)) => method,
        _ => return Err(invalid(id)),
    };

    Ok(JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.to_string(),
        id,
        method,
        params: object.remove("params"),
    })
}
