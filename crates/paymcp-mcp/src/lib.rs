//! # paymcp-mcp
//!
//! MCP (Model Context Protocol) server runtime for paymcp.
//!
//! This crate turns a set of payment API tools into an MCP server. It
//! provides:
//!
//! - **Toolsets**: named groups of read and write tools, enabled as a unit
//! - **Read-only mode**: write tools are never registered
//! - **Parameter validation**: accumulating checks that report every bad argument at once
//! - **Per-request authentication**: a fixed client, or one derived from bearer credentials
//! - **Multiple transports**: stdio and HTTP
//!
//! ## Architecture
//!
//! ```text
//! AI Agent
//!       │
//!       │ JSON-RPC (initialize / tools/list / tools/call)
//!       ▼
//! ┌──────────────────────┐
//! │  McpServer           │
//! │  1. Check envelope   │
//! │  2. Authenticate     │  ← Authenticator → RequestScope
//! │  3. Route method     │
//! │  4. Validate args    │  ← ParamValidator
//! │  5. Call backend     │  ← PaymentsClient
//! │  6. Return result    │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!      Payments REST API
//! ```
//!
//! ## Example Usage
//!
//! ```ignore
//! use paymcp_mcp::{Authenticator, McpServer, ServerInfo, ToolRegistry, ToolsetGroup};
//!
//! let mut group = ToolsetGroup::new(false);
//! // group.add_toolset(...)
//! group.enable_toolsets::<&str>(&[])?;
//!
//! let mut registry = ToolRegistry::new();
//! group.register_tools(&mut registry)?;
//!
//! let server = McpServer::new(
//!     ServerInfo::new("paymcp", "0.4.0"),
//!     registry,
//!     Authenticator::new().with_default_client(client),
//! );
//! server.run_stdio(cancel).await?;
//! ```

pub mod auth;
pub mod error;
pub mod http_transport;
pub mod params;
pub mod protocol;
pub mod schema;
pub mod server;
pub mod stdio;
pub mod tools;
pub mod toolsets;


pub use auth::{AuthError, Authenticator, RequestScope, TransportCredentials, parse_bearer};
pub use error::McpError;
pub use http_transport::{HttpServer, create_router};
pub use params::{Arguments, ParamError, ParamValidator, ValidationErrors};
pub use protocol::{
    CallToolParams, CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerInfo,
    ToolAnnotations, ToolContent, ToolDefinition,
};
pub use schema::{ParamKind, ParamSpec};
pub use server::McpServer;
pub use tools::{Tool, ToolHandler, ToolRegistry};
pub use toolsets::{Toolset, ToolsetError, ToolsetGroup};
