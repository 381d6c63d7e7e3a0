//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Server-sent events: one stream per session, messages via POST.
    #[cfg(feature = "sse")]
    Sse(SseConfig),

    /// Standard input/output transport.
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP transport with JSON-RPC over POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// SSE transport configuration.
#[cfg(feature = "sse")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_sse_host")]
    pub host: String,

    /// Path clients GET to open a session stream.
    #[serde(default = "default_sse_path")]
    pub sse_path: String,

    /// Path clients POST JSON-RPC messages to.
    #[serde(default = "default_message_path")]
    pub message_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_http_host")]
    pub host: String,

    /// Path for JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(feature = "sse")]
const DEFAULT_SSE_PORT: u16 = 3001;

#[cfg(feature = "http")]
const DEFAULT_HTTP_PORT: u16 = 8080;

#[cfg(feature = "sse")]
fn default_sse_host() -> String {
    "0.0.0.0".to_string()
}

#[cfg(feature = "sse")]
fn default_sse_path() -> String {
    "/sse".to_string()
}

#[cfg(feature = "sse")]
fn default_message_path() -> String {
    "/message".to_string()
}

#[cfg(feature = "http")]
fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(any(feature = "http", feature = "sse"))]
fn default_cors() -> bool {
    true
}

#[cfg(any(feature = "http", feature = "sse"))]
fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v.to_lowercase() != "false" && v != "0")
        .unwrap_or(default)
}

#[cfg(any(feature = "http", feature = "sse"))]
fn env_port(names: &[&str], default: u16) -> u16 {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok().and_then(|p| p.parse().ok()))
        .unwrap_or(default)
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "sse")]
        {
            return Self::Sse(SseConfig::default());
        }

        #[cfg(all(not(feature = "sse"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "sse"), not(feature = "stdio"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "sse", feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: sse, stdio, or http");
        }
    }
}

#[cfg(feature = "sse")]
impl Default for SseConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSE_PORT,
            host: default_sse_host(),
            sse_path: default_sse_path(),
            message_path: default_message_path(),
            enable_cors: default_cors(),
        }
    }
}

#[cfg(feature = "sse")]
impl SseConfig {
    /// Load SSE settings from the environment.
    ///
    /// The port comes from `MCP_SSE_PORT`, then the conventional `PORT`.
    pub fn from_env() -> Self {
        Self {
            port: env_port(&["MCP_SSE_PORT", "PORT"], DEFAULT_SSE_PORT),
            host: std::env::var("MCP_SSE_HOST").unwrap_or_else(|_| default_sse_host()),
            sse_path: std::env::var("MCP_SSE_PATH").unwrap_or_else(|_| default_sse_path()),
            message_path: std::env::var("MCP_SSE_MESSAGE_PATH")
                .unwrap_or_else(|_| default_message_path()),
            enable_cors: env_flag("MCP_SSE_CORS", default_cors()),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_http_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// Load HTTP settings from the environment.
    pub fn from_env() -> Self {
        Self {
            port: env_port(&["MCP_HTTP_PORT"], DEFAULT_HTTP_PORT),
            host: std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_http_host()),
            rpc_path: std::env::var("MCP_HTTP_PATH").unwrap_or_else(|_| default_rpc_path()),
            enable_cors: env_flag("MCP_HTTP_CORS", default_cors()),
        }
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    ///
    /// `MCP_TRANSPORT` selects the transport; unset or unknown values fall
    /// back to the default (SSE when compiled in).
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "http")]
            "http" => Self::Http(HttpConfig::from_env()),
            #[cfg(feature = "sse")]
            _ => Self::Sse(SseConfig::from_env()),
            #[cfg(not(feature = "sse"))]
            _ => Self::default(),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "sse")]
            Self::Sse(cfg) => format!(
                "SSE on {}:{} (stream {}, messages {})",
                cfg.host, cfg.port, cfg.sse_path, cfg.message_path
            ),
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }

    /// Check if this transport is the STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}
