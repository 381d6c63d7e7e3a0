//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - JSON dispatch for tool calls (used by the HTTP and SSE transports)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(any(feature = "http", feature = "sse"))]
use tracing::warn;

use rmcp::model::Tool;

#[cfg(any(feature = "http", feature = "sse"))]
use super::ToolError;
use super::definitions::{ForecastSource, GetForecastTool};

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    #[cfg_attr(not(any(feature = "http", feature = "sse")), allow(dead_code))]
    source: Arc<dyn ForecastSource>,
}

impl ToolRegistry {
    /// Create a new tool registry backed by the given forecast source.
    pub fn new(source: Arc<dyn ForecastSource>) -> Self {
        Self { source }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![GetForecastTool::NAME]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![GetForecastTool::to_tool()]
    }

    /// Dispatch a JSON tool call to the appropriate handler.
    #[cfg(any(feature = "http", feature = "sse"))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        match name {
            GetForecastTool::NAME => {
                GetForecastTool::http_handler(arguments, self.source.clone()).await
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}
