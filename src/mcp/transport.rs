// ABOUTME: Line-delimited JSON-RPC transport over stdin/stdout
// ABOUTME: Reads one message per line, writes one response per line, never logs to stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stdio Transport
//!
//! Messages are processed in order from a single reader. Generic over the
//! reader and writer so the loop can be driven from in-memory buffers.

use anyhow::Result;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info};

use crate::mcp::protocol::ProtocolHandler;
use crate::mcp::resources::ServerResources;

/// Run MCP server using stdio transport (newline-delimited JSON-RPC)
///
/// # Errors
///
/// Returns an error if stdin cannot be read or stdout cannot be written
pub async fn run_stdio_transport(resources: ServerResources) -> Result<()> {
    info!("MCP stdio transport ready - listening on stdin/stdout");
    let reader = BufReader::new(io::stdin());
    let writer = io::stdout();
    serve(reader, writer, &resources).await?;
    info!("MCP stdio transport ended");
    Ok(())
}

/// Serve messages from `reader` until end of input
///
/// # Errors
///
/// Returns an error if reading or writing fails; a response that cannot be
/// serialized is logged and skipped
pub async fn serve<R, W>(mut reader: R, mut writer: W, resources: &ServerResources) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    while reader.read_line(&mut line).await? > 0 {
        let trimmed_line = line.trim();
        if trimmed_line.is_empty() {
            line.clear();
            continue;
        }

        if let Some(response) = ProtocolHandler::handle_message(trimmed_line, resources).await {
            match serde_json::to_string(&response) {
                Ok(response_str) => {
                    writer.write_all(response_str.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                }
                Err(e) => error!("Failed to serialize response: {e}"),
            }
        }
        line.clear();
    }
    Ok(())
}
