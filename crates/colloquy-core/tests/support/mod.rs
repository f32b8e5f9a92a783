#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result as AnyResult};
use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;

use colloquy_llm::{ChatClient, ChatRequest, ChatResponse};
use colloquy_persist::{
    Conversation, ConversationStore, PersistError, Result as PersistResult, Turn, TurnRole,
    TurnStore,
};

// ============================================================================
// In-memory stores
// ============================================================================

#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: Mutex<Vec<Conversation>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn summary_of(&self, id: ObjectId) -> Option<String> {
        self.conversations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.summary.clone())
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, title: &str) -> PersistResult<Conversation> {
        let now = Utc::now();
        let conversation = Conversation {
            id: ObjectId::new(),
            title: title.to_string(),
            summary: None,
            created_at: now,
            updated_at: now,
        };
        self.conversations
            .lock()
            .unwrap()
            .push(conversation.clone());
        Ok(conversation)
    }

    async fn get(&self, id: ObjectId) -> PersistResult<Option<Conversation>> {
        Ok(self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_all(&self) -> PersistResult<Vec<Conversation>> {
        let mut all = self.conversations.lock().unwrap().clone();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all)
    }

    async fn update_summary(&self, id: ObjectId, summary: &str) -> PersistResult<()> {
        let mut conversations = self.conversations.lock().unwrap();
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| PersistError::ConversationNotFound(id.to_string()))?;
        conversation.summary = Some(summary.to_string());
        conversation.updated_at = Utc::now();
        Ok(())
    }

    async fn touch(&self, id: ObjectId) -> PersistResult<()> {
        let mut conversations = self.conversations.lock().unwrap();
        if let Some(conversation) = conversations.iter_mut().find(|c| c.id == id) {
            conversation.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> PersistResult<()> {
        self.conversations.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn ping(&self) -> PersistResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTurnStore {
    turns: Mutex<Vec<Turn>>,
}

impl InMemoryTurnStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed `count` alternating user/assistant turns (user first)
    pub fn seed(&self, conversation_id: ObjectId, count: usize) {
        let mut turns = self.turns.lock().unwrap();
        for i in 0..count {
            let role = if i % 2 == 0 {
                TurnRole::User
            } else {
                TurnRole::Assistant
            };
            turns.push(Turn {
                id: ObjectId::new(),
                conversation_id,
                role,
                content: format!("turn {}", i),
                created_at: Utc::now(),
            });
        }
    }

    pub fn count_for(&self, conversation_id: ObjectId) -> usize {
        self.turns
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.conversation_id == conversation_id)
            .count()
    }
}

#[async_trait]
impl TurnStore for InMemoryTurnStore {
    async fn append(
        &self,
        conversation_id: ObjectId,
        role: TurnRole,
        content: &str,
    ) -> PersistResult<Turn> {
        let turn = Turn {
            id: ObjectId::new(),
            conversation_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.turns.lock().unwrap().push(turn.clone());
        Ok(turn)
    }

    async fn recent_turns(&self, conversation_id: ObjectId, limit: i64) -> PersistResult<Vec<Turn>> {
        Ok(self
            .turns
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|t| t.conversation_id == conversation_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn all_turns(&self, conversation_id: ObjectId) -> PersistResult<Vec<Turn>> {
        Ok(self
            .turns
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn delete_all(&self, conversation_id: ObjectId) -> PersistResult<()> {
        self.turns
            .lock()
            .unwrap()
            .retain(|t| t.conversation_id != conversation_id);
        Ok(())
    }
}

// ============================================================================
// Scripted completion provider
// ============================================================================

/// Fake `ChatClient`: pops scripted responses in order, records every
/// request for inspection, and falls back to a fixed reply when the script
/// is exhausted.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<AnyResult<ChatResponse>>>,
    default_reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn always(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            default_reply: Some(reply.to_string()),
            ..Self::default()
        })
    }

    pub fn push_reply(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response_with(Some(text))));
    }

    pub fn push_empty(&self) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response_with(None)));
    }

    pub fn push_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(anyhow!("{}", message)));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn response_with(content: Option<&str>) -> ChatResponse {
    ChatResponse {
        content: content.map(str::to_string),
        usage: None,
        finish_reason: Some("stop".to_string()),
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, request: ChatRequest) -> AnyResult<ChatResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(scripted) = self.responses.lock().unwrap().pop_front() {
            return scripted;
        }
        match &self.default_reply {
            Some(reply) => Ok(response_with(Some(reply.as_str()))),
            None => Err(anyhow!("no scripted response left")),
        }
    }
}
