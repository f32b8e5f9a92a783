use std::sync::Arc;

use bson::oid::ObjectId;

use colloquy_llm::{ChatClient, ChatRequest};
use colloquy_persist::{Conversation, ConversationStore, Turn, TurnRole, TurnStore};

use crate::config::ChatConfig;
use crate::context::ContextAssembler;
use crate::error::{ChatError, Result};
use crate::locks::ConversationLocks;
use crate::prompts::EMPTY_REPLY_PLACEHOLDER;
use crate::summarizer::Summarizer;
use crate::title::TitleGenerator;

/// Result of one completed exchange
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub conversation_id: ObjectId,
}

/// Single entry point for the conversation lifecycle.
///
/// Owns the create-vs-continue decision, the turn-append ordering, the
/// bounded prompt assembly, the primary completion call, and the
/// best-effort summary refresh.
pub struct ChatService {
    conversations: Arc<dyn ConversationStore>,
    turns: Arc<dyn TurnStore>,
    provider: Arc<dyn ChatClient>,
    config: ChatConfig,
    assembler: ContextAssembler,
    titles: TitleGenerator,
    summarizer: Summarizer,
    locks: ConversationLocks,
}

impl ChatService {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        turns: Arc<dyn TurnStore>,
        provider: Arc<dyn ChatClient>,
        config: ChatConfig,
    ) -> Self {
        let assembler = ContextAssembler::new(
            Arc::clone(&turns),
            config.window_size,
            config.summary_prefix.clone(),
        );
        let titles = TitleGenerator::new(Arc::clone(&provider), &config);
        let summarizer = Summarizer::new(Arc::clone(&conversations), Arc::clone(&provider), &config);

        Self {
            conversations,
            turns,
            provider,
            config,
            assembler,
            titles,
            summarizer,
            locks: ConversationLocks::new(),
        }
    }

    /// Handle one incoming user message.
    ///
    /// Resolves or creates the conversation, records the user turn, builds
    /// the bounded context, calls the provider, maybe refreshes the rolling
    /// summary, records the assistant turn, and returns the reply.
    ///
    /// On provider failure the request fails with [`ChatError::Provider`]
    /// and the already-appended user turn is retained: the question stays on
    /// record even though it was never answered.
    pub async fn send_message(
        &self,
        text: &str,
        conversation_id: Option<ObjectId>,
    ) -> Result<Reply> {
        let id = match conversation_id {
            Some(id) => {
                self.conversations
                    .get(id)
                    .await?
                    .ok_or(ChatError::NotFound(id))?
                    .id
            }
            None => {
                let title = self.titles.title_for(text).await;
                let conversation = self.conversations.create(&title).await?;
                tracing::info!(
                    "Created conversation {} titled {:?}",
                    conversation.id,
                    conversation.title
                );
                conversation.id
            }
        };

        // Serialize the whole exchange per conversation; unrelated
        // conversations run in parallel.
        let _guard = self.locks.acquire(id).await;

        // Re-read under the lock so the window and summary reflect any
        // exchange that finished while we waited.
        let conversation = self
            .conversations
            .get(id)
            .await?
            .ok_or(ChatError::NotFound(id))?;

        // User turn must be durable before the context is assembled.
        self.turns.append(id, TurnRole::User, text).await?;

        let context = self.assembler.assemble(&conversation).await?;

        let request = ChatRequest::new(self.config.model.as_str(), context.clone())
            .with_options(self.config.reply.options());
        let response = self
            .provider
            .chat(request)
            .await
            .map_err(ChatError::Provider)?;

        let reply_text = response
            .text()
            .map(str::to_string)
            .unwrap_or_else(|| EMPTY_REPLY_PLACEHOLDER.to_string());

        // Best-effort rollup, decoupled from the reply path: fire and
        // forget, failures only logged.
        if self.summarizer.should_refresh(context.len()) {
            let summarizer = self.summarizer.clone();
            let context = context.clone();
            tokio::spawn(async move {
                if let Err(e) = summarizer.refresh(id, &context).await {
                    tracing::error!("Failed to refresh summary for conversation {}: {}", id, e);
                }
            });
        }

        self.turns.append(id, TurnRole::Assistant, &reply_text).await?;
        self.conversations.touch(id).await?;

        Ok(Reply {
            text: reply_text,
            conversation_id: id,
        })
    }

    /// All conversations, most recently updated first
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        Ok(self.conversations.list_all().await?)
    }

    /// Recent turns in chronological order, for display
    pub async fn recent_turns(&self, conversation_id: ObjectId, limit: i64) -> Result<Vec<Turn>> {
        self.conversations
            .get(conversation_id)
            .await?
            .ok_or(ChatError::NotFound(conversation_id))?;

        let mut turns = self.turns.recent_turns(conversation_id, limit).await?;
        turns.reverse();
        Ok(turns)
    }

    /// Delete a conversation and every turn it owns
    pub async fn delete_conversation(&self, conversation_id: ObjectId) -> Result<()> {
        self.conversations
            .get(conversation_id)
            .await?
            .ok_or(ChatError::NotFound(conversation_id))?;

        let _guard = self.locks.acquire(conversation_id).await;

        self.turns.delete_all(conversation_id).await?;
        self.conversations.delete(conversation_id).await?;

        drop(_guard);
        self.locks.remove(conversation_id).await;

        tracing::info!("Deleted conversation {}", conversation_id);
        Ok(())
    }
}
