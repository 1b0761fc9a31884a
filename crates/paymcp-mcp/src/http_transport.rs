//! HTTP transport for the MCP server.
//!
//! Each POST body is one JSON-RPC message; the response goes back in the
//! HTTP response body. The `Authorization` header is handed to the
//! authenticator untouched. `GET /live` and `GET /ready` answer `OK` for
//! probes.

use crate::auth::TransportCredentials;
use crate::error::McpError;
use crate::protocol::JsonRpcResponse;
use crate::server::McpServer;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tokio_util::sync::CancellationToken;

const X_ACCEL_BUFFERING: &str = "x-accel-buffering";

/// Create the HTTP router for MCP.
pub fn create_router(server: McpServer) -> Router {
    Router::new()
        .route("/", post(handle_rpc))
        .route("/mcp", post(handle_rpc))
        .route("/live", get(handle_health))
        .route("/ready", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

async fn handle_rpc(State(server): State<McpServer>, headers: HeaderMap, body: Bytes) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    let credentials = TransportCredentials::AuthorizationHeader(authorization);

    match server.handle_message(&body, &credentials).await {
        Some(response) => json_response(&response),
        None => (
            StatusCode::ACCEPTED,
            [(HeaderName::from_static(X_ACCEL_BUFFERING), "no")],
        )
            .into_response(),
    }
}

fn json_response(response: &JsonRpcResponse) -> Response {
    match serde_json::to_vec(response) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json"),
                (HeaderName::from_static(X_ACCEL_BUFFERING), "no"),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode JSON-RPC response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn handle_health() -> &'static str {
    "OK"
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    addr: String,
    server: McpServer,
}

impl HttpServer {
    pub fn new(addr: impl Into<String>, server: McpServer) -> Self {
        Self {
            addr: addr.into(),
            server,
        }
    }

    /// Serve until `cancel` fires, then drain in-flight requests.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), McpError> {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| McpError::StartupFailed(format!("failed to bind to {}: {}", self.addr, e)))?;

        tracing::info!(address = %self.addr, "MCP HTTP server listening");

        axum::serve(listener, create_router(self.server))
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
            .map_err(|e| McpError::TransportError(e.to_string()))?;

        tracing::info!("MCP HTTP server stopped");
        Ok(())
    }
}
