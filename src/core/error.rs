//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! the tools domain, the transport layer and external dependencies.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// The upstream HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
