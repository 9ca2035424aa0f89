//! Message exchange HTTP handler.
//!
//! POST /api/v1/sessions/{id}/messages
//!
//! The load-respond-save cycle runs under the per-session lock so a
//! double-submitted message cannot interleave with itself -- the store is
//! exclusively owned by one in-flight respond at a time.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reflecto_types::turn::Turn;

use crate::http::error::AppError;
use crate::http::handlers::session::{load_store, save_store, visible_history};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for sending a message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// The user message to send.
    pub message: String,
}

/// Response body: the reply plus the visible history after the exchange.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub reply: String,
    pub history: Vec<Turn>,
}

/// Reject blank or whitespace-only user text before touching the store.
fn validate_message(message: &str) -> Result<(), AppError> {
    if message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }
    Ok(())
}

/// POST /api/v1/sessions/{id}/messages - Send user text, get the reply.
///
/// Always returns a plain reply string, even when the remote completion
/// call fails -- the orchestrator absorbs those into fallback text.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SendMessageRequest>,
) -> Result<ApiResponse<SendMessageResponse>, AppError> {
    let start = Instant::now();

    validate_message(&body.message)?;

    let lock = state.session_lock(id);
    let _guard = lock.lock().await;

    let mut store = load_store(&state, &id).await?;
    let reply = state.orchestrator.respond(&mut store, &body.message).await;
    save_store(&state, &id, &store).await?;

    Ok(ApiResponse::success(
        SendMessageResponse {
            reply,
            history: visible_history(&store),
        },
        Uuid::now_v7().to_string(),
        start.elapsed().as_millis() as u64,
    ))
}
