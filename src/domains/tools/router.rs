//! Tool Router - builds the rmcp ToolRouter.
//!
//! This module builds the ToolRouter for STDIO transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{ForecastSource, GetForecastTool};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(source: Arc<dyn ForecastSource>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new().with_route(GetForecastTool::create_route(source))
}
