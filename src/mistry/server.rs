//! HTTP surface for the chat backend (feature `server`).
//!
//! | Method   | Path           | Body / Response                                      |
//! |----------|----------------|------------------------------------------------------|
//! | `GET`    | `/`            | banner with status and version                       |
//! | `POST`   | `/api/chat`    | `{prompt, model = 1}` → `{reply, model, solved_locally}` |
//! | `GET`    | `/api/history` | `{history: [...]}`                                   |
//! | `DELETE` | `/api/history` | clears the history                                   |
//! | `GET`    | `/health`      | `{status, timestamp}`                                |
//!
//! ```rust,no_run
//! use mistry::MistryConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = MistryConfig::from_env()?;
//!     mistry::server::serve(config).await
//! }
//! ```

use crate::chat_session::{ChatError, ChatSession, Provider};
use crate::config::MistryConfig;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    /// `1` selects OpenAI, anything else Gemini.
    #[serde(default = "default_model_selector")]
    pub model: i64,
}

fn default_model_selector() -> i64 {
    1
}

/// Builds the router over a shared session.
pub fn router(session: Arc<ChatSession>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/chat", post(chat))
        .route("/api/history", get(history).delete(clear_history))
        .route("/health", get(health))
        .with_state(session)
}

/// Binds `0.0.0.0:{port}` and serves until the process exits.
pub async fn serve(config: MistryConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let session = Arc::new(ChatSession::from_config(&config));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    log::info!(
        "জাদুকর (JADOOKOR) backend server running on port {}",
        listener.local_addr()?.port()
    );

    axum::serve(listener, router(session)).await?;
    Ok(())
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "জাদুকর (JADOOKOR) - The Mystical AI Assistant Backend",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn chat(
    State(session): State<Arc<ChatSession>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let prompt = request.prompt.unwrap_or_default();
    let provider = Provider::from_selector(request.model);

    match session.chat(&prompt, provider).await {
        Ok(reply) => (StatusCode::OK, Json(json!(reply))),
        Err(ChatError::EmptyPrompt) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Prompt is required"})),
        ),
        Err(ChatError::Upstream(details)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "An error occurred while consulting the ancient texts",
                "details": details,
            })),
        ),
    }
}

async fn history(State(session): State<Arc<ChatSession>>) -> impl IntoResponse {
    let entries = session.history().await;
    Json(json!({ "history": entries }))
}

async fn clear_history(State(session): State<Arc<ChatSession>>) -> impl IntoResponse {
    session.clear_history().await;
    Json(json!({ "message": "Conversation history cleared" }))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
    }))
}
