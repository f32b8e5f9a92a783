use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::routes::parse_conversation_id;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message: String,
    pub conversation_id: String,
}

/// Handle one user message: continue the referenced conversation or start a
/// fresh one, and return the assistant's reply
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let conversation_id = req
        .conversation_id
        .as_deref()
        .map(parse_conversation_id)
        .transpose()?;

    let reply = state.chat.send_message(&req.message, conversation_id).await?;

    Ok(Json(SendMessageResponse {
        message: reply.text,
        conversation_id: reply.conversation_id.to_hex(),
    }))
}
