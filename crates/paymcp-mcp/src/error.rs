//! Error types for the MCP crate.

use thiserror::Error;

/// Errors that can stop the MCP server or fail its construction.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// A tool name was registered twice.
    #[error("tool {name} is already registered")]
    DuplicateTool { name: String },

    /// Transport error.
    #[error("transport error: {0}")]
    TransportError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
