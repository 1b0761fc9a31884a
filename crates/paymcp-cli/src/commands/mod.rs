//! CLI command implementations for the paymcp server.

pub mod serve;
pub mod tools;

use anyhow::{Context, Result};
use clap::Args;
use paymcp_core::{PaymcpConfig, Transport};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "paymcp.yaml";

/// Flags shared by `stdio` and `http`.
#[derive(Debug, Clone, Default, Args)]
pub struct ServerArgs {
    /// Configuration file. `paymcp.yaml` is read if present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Comma separated toolsets to enable (default: all).
    #[arg(long, value_delimiter = ',')]
    pub toolsets: Vec<String>,

    /// Only register tools that read data.
    #[arg(long)]
    pub read_only: bool,

    /// API key id (overrides config and environment).
    #[arg(long)]
    pub key_id: Option<String>,

    /// API key secret (overrides config and environment).
    #[arg(long)]
    pub key_secret: Option<String>,

    /// Base URL of the payments API.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Log level or filter directive, e.g. `debug` or `paymcp_mcp=trace`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

/// Flags for `http`.
#[derive(Debug, Clone, Default, Args)]
pub struct HttpArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Address to bind.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Flags for `tools`.
#[derive(Debug, Clone, Default, Args)]
pub struct ToolsArgs {
    /// Configuration file. `paymcp.yaml` is read if present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Comma separated toolsets to list (default: all).
    #[arg(long, value_delimiter = ',')]
    pub toolsets: Vec<String>,

    /// List only the tools a read-only server would expose.
    #[arg(long)]
    pub read_only: bool,

    /// Print each tool's input schema.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Load the config file, falling back to defaults when the implicit
/// `paymcp.yaml` does not exist. An explicitly named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<PaymcpConfig> {
    match path {
        Some(path) => PaymcpConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            if default.exists() {
                PaymcpConfig::from_file(default)
                    .with_context(|| format!("failed to load configuration from {DEFAULT_CONFIG}"))
            } else {
                Ok(PaymcpConfig::default())
            }
        }
    }
}

impl ServerArgs {
    /// Load the configuration and apply command line overrides.
    pub fn resolve(&self, transport: Transport) -> Result<PaymcpConfig> {
        let mut config = load_config(self.config.as_deref())?;
        self.apply(&mut config);
        config.mcp.transport = transport;
        Ok(config)
    }

    fn apply(&self, config: &mut PaymcpConfig) {
        if !self.toolsets.is_empty() {
            config.toolsets.enabled = self.toolsets.clone();
        }
        if self.read_only {
            config.toolsets.read_only = true;
        }
        if let Some(key_id) = &self.key_id {
            config.api.key_id = Some(key_id.clone());
        }
        if let Some(key_secret) = &self.key_secret {
            config.api.key_secret = Some(key_secret.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        if self.log_json {
            config.logging.json = true;
        }
    }
}

impl HttpArgs {
    pub fn resolve(&self) -> Result<PaymcpConfig> {
        let mut config = self.server.resolve(Transport::Http)?;
        if let Some(host) = &self.host {
            config.mcp.host = host.clone();
        }
        if let Some(port) = self.port {
            config.mcp.port = port;
        }
        Ok(config)
    }
}
