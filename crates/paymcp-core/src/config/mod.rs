//! Configuration types for paymcp.
//!
//! Configuration is loaded from a single YAML file (`paymcp.yaml` by default).
//! Every section is optional; CLI flags override file values and credentials
//! may come from environment variables.
//!
//! ```yaml
//! server:
//!   name: paymcp
//! mcp:
//!   transport: http
//!   port: 8090
//! toolsets:
//!   enabled: [payments, orders]
//!   read_only: true
//! api:
//!   key_id_env: PAYMCP_KEY_ID
//!   key_secret_env: PAYMCP_KEY_SECRET
//! logging:
//!   level: debug
//! ```

pub mod api;
pub mod mcp;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use api::{ApiConfig, ResolvedCredentials};
pub use mcp::{McpConfig, Transport};

/// Complete paymcp configuration loaded from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymcpConfig {
    /// Identity reported to MCP clients.
    #[serde(default)]
    pub server: ServerConfig,

    /// Transport settings.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Which toolsets are exposed.
    #[serde(default)]
    pub toolsets: ToolsetsConfig,

    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server identity reported in the `initialize` handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_name")]
    pub name: String,

    #[serde(default = "default_server_version")]
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            version: default_server_version(),
        }
    }
}

/// Toolset enablement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsetsConfig {
    /// Toolsets to enable. An empty list enables every registered toolset.
    #[serde(default)]
    pub enabled: Vec<String>,

    /// Suppress registration of all write tools.
    #[serde(default)]
    pub read_only: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,

    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: None,
        }
    }
}

fn default_server_name() -> String {
    "paymcp".to_string()
}

fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymcpConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }
}
