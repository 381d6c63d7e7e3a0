//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tools domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/`. Each tool defines:
//! - Parameters struct (for rmcp)
//! - `execute()` method (core logic)
//! - `http_handler()` method (called via ToolRegistry for HTTP/SSE transport)
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::{
    build_tool_router,
    definitions::{ForecastSource, NwsClient},
};

#[cfg(any(feature = "http", feature = "sse"))]
use crate::domains::tools::{ToolError, ToolRegistry};

/// Instructions advertised to clients on initialization.
pub const INSTRUCTIONS: &str = "Weather forecast server backed by the US National Weather Service. \
     Call `getforecast` with a latitude and longitude (decimal degrees, US locations only).";

/// The main MCP server handler.
///
/// Cloning is cheap: the configuration and forecast source are shared, and
/// no per-call state lives here.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Upstream forecast source shared by every tool call.
    source: Arc<dyn ForecastSource>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server talking to the configured NWS endpoint.
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = NwsClient::new(&config.weather)?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Create a server backed by an arbitrary forecast source.
    pub fn with_source(config: Config, source: Arc<dyn ForecastSource>) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(source.clone()),
            config: Arc::new(config),
            source,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the upstream forecast source.
    pub fn source(&self) -> &Arc<dyn ForecastSource> {
        &self.source
    }

    // ========================================================================
    // HTTP/SSE Transport Support Methods
    // ========================================================================

    /// List all available tools as JSON.
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name.
    ///
    /// Dispatches through the ToolRegistry; the returned value is the MCP
    /// `CallToolResult` shape (`content`, `isError`).
    #[cfg(any(feature = "http", feature = "sse"))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let registry = ToolRegistry::new(self.source().clone());
        registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
