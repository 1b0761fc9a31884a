//! Newline-delimited JSON-RPC over a byte stream.
//!
//! One message per line, one response line per request, handled strictly in
//! order. Logs must go to stderr when this runs on the process stdout.

use crate::auth::TransportCredentials;
use crate::error::McpError;
use crate::server::McpServer;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Serve `server` on `reader`/`writer` until end of input or cancellation.
///
/// Lines are handed to the dispatcher as raw bytes, so a line that is not
/// valid UTF-8 gets a parse error response like any other malformed message.
/// Blank lines are ignored. Cancellation is observed while waiting for input
/// and while a request is being handled; either way the loop returns `Ok`.
/// A read or write failure ends the loop with an error.
pub async fn serve<R, W>(
    server: &McpServer,
    reader: R,
    mut writer: W,
    cancel: CancellationToken,
) -> Result<(), McpError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let credentials = TransportCredentials::None;

    loop {
        line.clear();
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Stdio transport cancelled");
                return Ok(());
            }
            read = reader.read_until(b'\n', &mut line) => read?,
        };

        if read == 0 {
            tracing::info!("Input closed, stopping stdio transport");
            return Ok(());
        }

        let message = line.trim_ascii();
        if message.is_empty() {
            continue;
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Stdio transport cancelled with a request in flight");
                return Ok(());
            }
            response = server.handle_message(message, &credentials) => response,
        };

        if let Some(response) = response {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }
}
