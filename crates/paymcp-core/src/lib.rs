//! Shared types for the paymcp workspace.
//!
//! Only configuration lives here; the protocol runtime is in `paymcp-mcp`
//! and the backend client in `paymcp-client`.

// Configuration types shared across all paymcp crates
pub mod config;

pub use config::{
    ApiConfig, ConfigError, LoggingConfig, McpConfig, PaymcpConfig, ResolvedCredentials,
    ServerConfig, ToolsetsConfig, Transport,
};
