//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations and their upstream clients
//! - `router.rs` - Dynamic ToolRouter builder for STDIO transport
//! - `registry.rs` - Central tool registry and HTTP/SSE dispatch
//! - `error.rs` - Tool dispatch error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new module in `definitions/`
//! 2. Define params, execute(), http_handler() and create_route()
//! 3. Export in `definitions/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`
//! 5. Register in `registry.rs` for HTTP/SSE support

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
