use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use colloquy_persist::{Conversation, Turn, TurnRole};

use crate::error::ApiResult;
use crate::routes::parse_conversation_id;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListConversationsResponse {
    pub conversations: Vec<ConversationResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TurnResponse {
    pub turn_id: String,
    pub role: TurnRole,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListTurnsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct ListTurnsResponse {
    pub messages: Vec<TurnResponse>,
}

/// List all conversations, most recently updated first
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ListConversationsResponse>> {
    let conversations = state.chat.list_conversations().await?;

    Ok(Json(ListConversationsResponse {
        conversations: conversations
            .into_iter()
            .map(conversation_to_response)
            .collect(),
    }))
}

/// Recent turns of a conversation, in chronological order for display
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    Query(query): Query<ListTurnsQuery>,
) -> ApiResult<Json<ListTurnsResponse>> {
    let id = parse_conversation_id(&conversation_id)?;
    let limit = query.limit.clamp(1, 100);

    let turns = state.chat.recent_turns(id, limit).await?;

    Ok(Json(ListTurnsResponse {
        messages: turns.into_iter().map(turn_to_response).collect(),
    }))
}

/// Delete a conversation and all of its turns
pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_conversation_id(&conversation_id)?;

    state.chat.delete_conversation(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn conversation_to_response(conversation: Conversation) -> ConversationResponse {
    ConversationResponse {
        conversation_id: conversation.id.to_hex(),
        title: conversation.title,
        summary: conversation.summary,
        created_at: conversation.created_at,
        updated_at: conversation.updated_at,
    }
}

fn turn_to_response(turn: Turn) -> TurnResponse {
    TurnResponse {
        turn_id: turn.id.to_hex(),
        role: turn.role,
        content: turn.content,
        created_at: turn.created_at,
    }
}
