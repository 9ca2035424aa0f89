//! Session lifecycle HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions               - Create a conversation
//! - GET    /api/v1/sessions/{id}/messages - Visible history
//! - POST   /api/v1/sessions/{id}/clear    - Reset to the preamble
//! - DELETE /api/v1/sessions/{id}          - Delete the conversation

use std::time::Instant;

use axum::extract::{Path, State};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use reflecto_core::conversation::ConversationStore;
use reflecto_types::turn::Turn;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Response body for session creation.
#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

/// Load and restore the store for a session.
///
/// Absent blob is a 404. A blob that fails to restore falls back to a
/// fresh store with the configured preamble (the failed bytes are
/// unrecoverable; the session id survives).
pub(crate) async fn load_store(
    state: &AppState,
    id: &Uuid,
) -> Result<ConversationStore, AppError> {
    let bytes = state
        .blobs
        .load(id)
        .await?
        .ok_or(AppError::SessionNotFound)?;

    match ConversationStore::restore(&bytes) {
        Ok(store) => Ok(store),
        Err(err) => {
            warn!(session_id = %id, %err, "Corrupt session blob, starting fresh");
            Ok(ConversationStore::new(&state.config.preamble))
        }
    }
}

pub(crate) async fn save_store(
    state: &AppState,
    id: &Uuid,
    store: &ConversationStore,
) -> Result<(), AppError> {
    let bytes = store
        .serialize()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    state.blobs.save(id, &bytes).await?;
    Ok(())
}

/// The turns shown to clients: everything but the system preamble.
pub(crate) fn visible_history(store: &ConversationStore) -> Vec<Turn> {
    store.snapshot()[1..].to_vec()
}

/// POST /api/v1/sessions - Create a fresh conversation.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<ApiResponse<SessionCreated>, AppError> {
    let start = Instant::now();
    let id = Uuid::now_v7();

    let store = ConversationStore::new(&state.config.preamble);
    save_store(&state, &id, &store).await?;

    info!(session_id = %id, "Session created");
    Ok(ApiResponse::success(
        SessionCreated { id },
        id.to_string(),
        start.elapsed().as_millis() as u64,
    ))
}

/// GET /api/v1/sessions/{id}/messages - Visible history.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Vec<Turn>>, AppError> {
    let start = Instant::now();
    let store = load_store(&state, &id).await?;

    Ok(ApiResponse::success(
        visible_history(&store),
        Uuid::now_v7().to_string(),
        start.elapsed().as_millis() as u64,
    ))
}

/// POST /api/v1/sessions/{id}/clear - Reset to the preamble only.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Vec<Turn>>, AppError> {
    let start = Instant::now();

    let lock = state.session_lock(id);
    let _guard = lock.lock().await;

    let mut store = load_store(&state, &id).await?;
    store.clear();
    save_store(&state, &id, &store).await?;

    info!(session_id = %id, "Session cleared");
    Ok(ApiResponse::success(
        visible_history(&store),
        Uuid::now_v7().to_string(),
        start.elapsed().as_millis() as u64,
    ))
}

/// DELETE /api/v1/sessions/{id} - Delete the conversation blob.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();

    let lock = state.session_lock(id);
    let _guard = lock.lock().await;

    if !state.blobs.delete(&id).await? {
        return Err(AppError::SessionNotFound);
    }
    drop(_guard);
    state.forget_session(&id);

    info!(session_id = %id, "Session deleted");
    Ok(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
        Uuid::now_v7().to_string(),
        start.elapsed().as_millis() as u64,
    ))
}
