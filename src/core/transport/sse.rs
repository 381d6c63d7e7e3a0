//! SSE transport implementation.
//!
//! The MCP "HTTP with SSE" transport:
//! - `GET /sse` opens a session. The first event is `endpoint`, whose data is
//!   the URL the client must POST its messages to (`/message?sessionId=...`).
//! - `POST /message?sessionId=...` accepts one JSON-RPC message and answers
//!   `202 Accepted`. The JSON-RPC response is delivered as a `message` event
//!   on the stream of that session, and only that session.
//!
//! Every session owns its own channel, looked up by id on each POST. A
//! session is forgotten as soon as its stream is dropped.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::rpc::{self, JsonRpcRequest, JsonRpcResponse};
use super::{TransportError, TransportResult, config::SseConfig};
use crate::core::McpServer;

/// Registry of open SSE sessions, keyed by session id.
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<Event>>>>,
}

impl Sessions {
    /// Register a new session and return its id and event receiver.
    pub fn open(&self) -> (String, mpsc::UnboundedReceiver<Event>) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut sessions) = self.inner.write() {
            sessions.insert(id.clone(), tx);
        }
        (id, rx)
    }

    /// Sender for a session, if it is still open.
    pub fn get(&self, id: &str) -> Option<mpsc::UnboundedSender<Event>> {
        self.inner
            .read()
            .ok()
            .and_then(|sessions| sessions.get(id).cloned())
    }

    /// Forget a session.
    pub fn close(&self, id: &str) {
        if let Ok(mut sessions) = self.inner.write() {
            sessions.remove(id);
        }
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether no session is open.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes its session from the registry when the event stream is dropped.
struct SessionGuard {
    sessions: Sessions,
    id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.close(&self.id);
        info!("SSE session {} closed", self.id);
    }
}

/// Application state shared across SSE handlers.
#[derive(Clone)]
struct AppState {
    server: McpServer,
    sessions: Sessions,
    message_path: String,
}

/// Query string of the message endpoint.
#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// SSE transport handler.
pub struct SseTransport {
    config: SseConfig,
    sessions: Sessions,
}

impl SseTransport {
    /// Create a new SSE transport with the given config.
    pub fn new(config: SseConfig) -> Self {
        Self {
            config,
            sessions: Sessions::default(),
        }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// The session registry backing this transport.
    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Build the axum router for this transport.
    pub fn router(&self, server: McpServer) -> Router {
        let state = AppState {
            server,
            sessions: self.sessions.clone(),
            message_path: self.config.message_path.clone(),
        };

        let info = rpc::root_info(
            "SSE",
            serde_json::json!({
                "sse": self.config.sse_path,
                "message": self.config.message_path,
                "health": "/health"
            }),
        );

        let mut app = Router::new()
            .route(&self.config.sse_path, get(handle_sse))
            .route(&self.config.message_path, post(handle_message))
            .route("/health", get(rpc::health_check))
            .route("/", get(move || async move { info }))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the SSE transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Server is running on {} (MCP over SSE)", addr);
        info!("  → Stream:   GET {}", self.config.sse_path);
        info!("  → Messages: POST {}?sessionId=<id>", self.config.message_path);

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Open a session stream.
async fn handle_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, rx) = state.sessions.open();
    info!("Received connection, SSE session {} opened", id);

    let endpoint = format!("{}?sessionId={}", state.message_path, id);
    let first = stream::once(async move {
        Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint))
    });

    let guard = SessionGuard {
        sessions: state.sessions.clone(),
        id,
    };
    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        rx.recv()
            .await
            .map(|event| (Ok::<_, Infallible>(event), (rx, guard)))
    });

    Sse::new(first.chain(messages)).keep_alive(KeepAlive::default())
}

/// Accept one JSON-RPC message for a session.
///
/// The message is processed in the background; its response (if any) is
/// pushed to the session's stream.
#[instrument(skip_all, fields(session = %query.session_id))]
async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    info!("Received message: {}", request.method);

    let Some(sender) = state.sessions.get(&query.session_id) else {
        warn!("Message for unknown session {}", query.session_id);
        return (StatusCode::NOT_FOUND, "Session not found").into_response();
    };

    tokio::spawn(async move {
        let Some(response) = rpc::process_request(&state.server, request).await else {
            return;
        };
        if let Err(e) = deliver(&sender, &response) {
            warn!("Dropping response for session {}: {}", query.session_id, e);
            state.sessions.close(&query.session_id);
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

/// Push a JSON-RPC response onto a session stream as a `message` event.
fn deliver(
    sender: &mpsc::UnboundedSender<Event>,
    response: &JsonRpcResponse,
) -> Result<(), String> {
    let event = Event::default()
        .event("message")
        .json_data(response)
        .map_err(|e| e.to_string())?;
    sender
        .send(event)
        .map_err(|_| "session stream closed".to_string())
}
