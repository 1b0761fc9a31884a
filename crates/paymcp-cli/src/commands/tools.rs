//! `paymcp tools`: print the tool catalogue without starting a server.

use super::{ToolsArgs, load_config};
use anyhow::{Context, Result};

/// List the tools a server with these settings would expose, grouped by toolset.
pub fn list(args: ToolsArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if !args.toolsets.is_empty() {
        config.toolsets.enabled = args.toolsets.clone();
    }
    let read_only = args.read_only || config.toolsets.read_only;

    let mut group =
        paymcp_tools::build_toolsets(read_only).context("failed to build toolsets")?;
    group
        .enable_toolsets(&config.toolsets.enabled)
        .context("failed to enable toolsets")?;

    let enabled: Vec<_> = group.toolsets().filter(|t| t.is_enabled()).collect();
    let total: usize = enabled
        .iter()
        .map(|t| t.active_tools(read_only).count())
        .sum();

    println!("\n🔧 Available Tools ({total}):");
    if read_only {
        println!("   (read-only mode)");
    }

    for toolset in enabled {
        println!("\n📦 {}: {}", toolset.name(), toolset.description());

        for tool in toolset.active_tools(read_only) {
            let access = if tool.is_read_only() { "read" } else { "write" };
            let definition = tool.definition();
            println!("   • {} ({access})", definition.name);
            println!("     {}", definition.description);

            if args.verbose {
                println!(
                    "     Schema: {}",
                    serde_json::to_string_pretty(&definition.input_schema)?
                );
            }
        }
    }

    println!();
    Ok(())
}
