use std::sync::Arc;

use colloquy_llm::Message;
use colloquy_persist::{Conversation, TurnRole, TurnStore};

use crate::error::Result;

/// Builds the exact ordered message list submitted to the provider.
///
/// Output length is bounded by `window_size + 1` (window plus the optional
/// summary preface) no matter how long the conversation has grown.
#[derive(Clone)]
pub struct ContextAssembler {
    turns: Arc<dyn TurnStore>,
    window_size: usize,
    summary_prefix: String,
}

impl ContextAssembler {
    pub fn new(turns: Arc<dyn TurnStore>, window_size: usize, summary_prefix: String) -> Self {
        Self {
            turns,
            window_size,
            summary_prefix,
        }
    }

    /// Assemble the prompt for the current state of `conversation`.
    ///
    /// The store returns the window most-recent-first; it is reversed back
    /// to chronological order here. When a rolling summary exists, a
    /// synthetic system turn (prefix + summary) is prepended; that turn is
    /// never persisted.
    pub async fn assemble(&self, conversation: &Conversation) -> Result<Vec<Message>> {
        let mut window = self
            .turns
            .recent_turns(conversation.id, self.window_size as i64)
            .await?;
        window.reverse();

        let mut messages: Vec<Message> = Vec::with_capacity(window.len() + 1);

        if let Some(summary) = conversation.summary_text() {
            messages.push(Message::system(format!(
                "{}{}",
                self.summary_prefix, summary
            )));
        }

        messages.extend(window.into_iter().map(|turn| match turn.role {
            TurnRole::User => Message::human(turn.content),
            TurnRole::Assistant => Message::ai(turn.content),
            TurnRole::System => Message::system(turn.content),
        }));

        Ok(messages)
    }
}
