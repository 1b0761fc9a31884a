//! `paymcp`: MCP server for the payments API.
//!
//! ```bash
//! paymcp stdio --toolsets payments,orders --read-only
//! paymcp http --port 8090
//! paymcp tools --verbose
//! ```
//!
//! In stdio mode stdout carries the protocol; all logs go to stderr (or to
//! `--log-file`).

mod commands;
mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{HttpArgs, ServerArgs, ToolsArgs};
use std::time::Duration;

/// Grace period for blocking tasks at exit. A pending stdin read never
/// finishes on its own, so the runtime must not wait for it.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "paymcp", version, about = "MCP server exposing payment API tools")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve MCP over stdin/stdout with a single set of API credentials.
    Stdio(ServerArgs),

    /// Serve MCP over HTTP. Without configured credentials every request must
    /// carry `Authorization: Bearer base64(key_id:key_secret)`.
    Http(HttpArgs),

    /// List the tools that would be served (offline).
    Tools(ToolsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Stdio(args) => block_on(commands::serve::stdio(args)),
        Command::Http(args) => block_on(commands::serve::http(args)),
        Command::Tools(args) => commands::tools::list(args),
    }
}

fn block_on(command: impl Future<Output = anyhow::Result<()>>) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let result = runtime.block_on(command);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}
