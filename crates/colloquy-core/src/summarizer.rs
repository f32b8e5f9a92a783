use std::sync::Arc;

use bson::oid::ObjectId;

use colloquy_llm::{ChatClient, ChatRequest, Message};
use colloquy_persist::ConversationStore;

use crate::config::{ChatConfig, GenParams};
use crate::error::{ChatError, Result};
use crate::prompts::GENERATE_CONVERSATION_SUMMARY;

/// Periodic rollup of older history into the conversation's single digest.
///
/// The cadence is evaluated against the *assembled* message count (the
/// synthetic summary preface counts), not the conversation's total turn
/// count. `should_refresh` is the knob to change if that reading is ever
/// revisited.
#[derive(Clone)]
pub struct Summarizer {
    conversations: Arc<dyn ConversationStore>,
    provider: Arc<dyn ChatClient>,
    model: String,
    interval: usize,
    params: GenParams,
}

impl Summarizer {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        provider: Arc<dyn ChatClient>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            conversations,
            provider,
            model: config.model.clone(),
            interval: config.summary_interval,
            params: config.summary,
        }
    }

    /// True iff the assembled context length sits exactly on the cadence.
    pub fn should_refresh(&self, assembled_len: usize) -> bool {
        assembled_len > 0 && assembled_len % self.interval == 0
    }

    /// Generate a digest of `context` and overwrite the stored summary.
    ///
    /// An empty provider result leaves the existing summary untouched.
    pub async fn refresh(&self, conversation_id: ObjectId, context: &[Message]) -> Result<()> {
        let mut messages = Vec::with_capacity(context.len() + 1);
        messages.push(Message::system(GENERATE_CONVERSATION_SUMMARY));
        messages.extend_from_slice(context);

        let request =
            ChatRequest::new(self.model.as_str(), messages).with_options(self.params.options());

        let response = self
            .provider
            .chat(request)
            .await
            .map_err(ChatError::Provider)?;

        let Some(summary) = response.text() else {
            return Err(ChatError::Provider(anyhow::anyhow!(
                "summarization returned no content"
            )));
        };

        self.conversations
            .update_summary(conversation_id, summary)
            .await?;

        tracing::info!("Summary refreshed for conversation {}", conversation_id);
        Ok(())
    }
}
