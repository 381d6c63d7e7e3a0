//! Weather MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing a single tool,
//! `getforecast`, which returns the US National Weather Service forecast for
//! a latitude/longitude as plain text.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the rmcp server handler and the
//!   transports (SSE, STDIO, HTTP)
//! - **domains**: business logic
//!   - **tools**: the forecast tool and its NWS API client
//!
//! # Example
//!
//! ```rust,no_run
//! use weather_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
