//! Transport layer for the MCP server.
//!
//! This module provides different transport implementations:
//! - **SSE**: Server-sent events session stream plus a message POST endpoint - feature: `sse`
//! - **STDIO**: Standard input/output - feature: `stdio`
//! - **HTTP**: HTTP server with JSON-RPC over POST requests - feature: `http`
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the MCP server handler.
//!
//! # Feature Flags
//!
//! - `sse` (default): SSE transport - adds axum, tower-http, uuid
//! - `stdio` (default): STDIO transport - minimal dependencies
//! - `http`: HTTP transport - adds axum, tower-http

mod config;
mod error;
mod service;

#[cfg(any(feature = "http", feature = "sse"))]
pub mod rpc;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "sse")]
pub mod sse;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

// Re-export configs for convenience
#[cfg(feature = "sse")]
pub use config::SseConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
