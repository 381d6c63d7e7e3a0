//! STDIO transport implementation.
//!
//! Serves a single MCP session over stdin/stdout through rmcp. Logs go to
//! stderr so they never interleave with protocol frames.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve until the client closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - serving {} over stdin/stdout", server.name());

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| TransportError::service(e.to_string()))?;

        info!("STDIO session closed: {:?}", reason);
        Ok(())
    }
}
