//! `paymcp stdio` and `paymcp http`.

use super::{HttpArgs, ServerArgs};
use crate::logging;
use anyhow::{Context, Result, bail};
use paymcp_client::{Credentials, HttpClientFactory, HttpPaymentsClient};
use paymcp_core::{PaymcpConfig, Transport};
use paymcp_mcp::{Authenticator, McpServer, ServerInfo};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn stdio(args: ServerArgs) -> Result<()> {
    let config = args.resolve(Transport::Stdio)?;
    logging::init(&config.logging)?;

    let Some(creds) = config
        .api
        .resolve_credentials()
        .context("invalid API credentials")?
    else {
        bail!(
            "stdio mode requires API credentials: pass --key-id/--key-secret, set api.key_id/api.key_secret, or export {} and {}",
            config.api.key_id_env,
            config.api.key_secret_env
        );
    };

    info!(key_id = %creds.key_id, "Using configured API credentials");
    let client = HttpPaymentsClient::new(
        config.api.base_url.clone(),
        Credentials::new(creds.key_id, creds.key_secret),
        timeout(&config),
    )
    .context("failed to create payments API client")?;
    let auth = Authenticator::new().with_default_client(Arc::new(client));

    serve(config, auth).await
}

pub async fn http(args: HttpArgs) -> Result<()> {
    let config = args.resolve()?;
    logging::init(&config.logging)?;

    let factory = HttpClientFactory::new(config.api.base_url.clone(), timeout(&config))
        .context("failed to create payments API client")?;
    let mut auth = Authenticator::new().with_client_factory(Arc::new(factory));

    if let Some(creds) = config
        .api
        .resolve_credentials()
        .context("invalid API credentials")?
    {
        info!(key_id = %creds.key_id, "Using configured API credentials");
        let client = HttpPaymentsClient::new(
            config.api.base_url.clone(),
            Credentials::new(creds.key_id, creds.key_secret),
            timeout(&config),
        )
        .context("failed to create payments API client")?;
        auth = auth.with_default_client(Arc::new(client));
    }

    if auth.has_default_client() {
        info!("Single-tenant mode: every request uses the configured credentials");
    } else {
        info!("Multi-tenant mode: requests must carry bearer credentials");
    }

    serve(config, auth).await
}

async fn serve(config: PaymcpConfig, auth: Authenticator) -> Result<()> {
    let registry =
        paymcp_tools::build_registry(&config.toolsets.enabled, config.toolsets.read_only)
            .context("failed to build tool registry")?;

    let server = McpServer::new(
        ServerInfo::new(config.server.name.clone(), config.server.version.clone()),
        registry,
        auth,
    );

    info!(
        name = %server.info().name,
        version = %server.info().version,
        tools = server.tools().len(),
        "MCP server ready"
    );

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    server
        .run(&config.mcp, cancel)
        .await
        .context("MCP server failed")?;

    info!("Shutdown complete");
    Ok(())
}

fn timeout(config: &PaymcpConfig) -> Duration {
    Duration::from_secs(config.api.timeout_secs)
}

/// Cancel `token` on Ctrl-C or SIGTERM.
async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
    token.cancel();
}
