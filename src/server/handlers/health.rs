use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
    }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "index": state.settings.index.name,
        "embedding_model": state.settings.embedding.model,
        "chat_model": state.settings.llm.model,
        "llm_provider": state.llm.name(),
    }))
}
