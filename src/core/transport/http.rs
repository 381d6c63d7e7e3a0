//! HTTP transport implementation.
//!
//! HTTP server with JSON-RPC over POST requests. Each POST carries one
//! message and receives its response inline, so plain HTTP clients (curl,
//! scripts) can call the forecast tool without holding a stream open.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument};

use super::rpc::{self, JsonRpcRequest};
use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum router for this transport.
    pub fn router(&self, server: McpServer) -> Router {
        let info = rpc::root_info(
            "HTTP",
            serde_json::json!({
                "rpc": self.config.rpc_path,
                "health": "/health"
            }),
        );

        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(rpc::health_check))
            .route("/", get(move || async move { info }))
            .with_state(server);

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Handle JSON-RPC requests.
#[instrument(skip_all)]
async fn handle_rpc(State(server): State<McpServer>, Json(request): Json<JsonRpcRequest>) -> Response {
    info!("Received JSON-RPC request: {}", request.method);

    match rpc::process_request(&server, request).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
