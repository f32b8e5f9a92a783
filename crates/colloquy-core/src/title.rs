use std::sync::Arc;

use anyhow::Result;

use colloquy_llm::{ChatClient, ChatRequest, Message};

use crate::config::{ChatConfig, GenParams};
use crate::prompts::{DEFAULT_TITLE, GENERATE_CONVERSATION_TITLE};

/// Derives a short human-readable title from the first user message.
///
/// Infallible to the caller: any provider failure or empty output falls
/// back to the fixed default title.
#[derive(Clone)]
pub struct TitleGenerator {
    provider: Arc<dyn ChatClient>,
    model: String,
    params: GenParams,
}

impl TitleGenerator {
    pub fn new(provider: Arc<dyn ChatClient>, config: &ChatConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            params: config.title,
        }
    }

    pub async fn title_for(&self, first_message: &str) -> String {
        match self.generate(first_message).await {
            Ok(Some(title)) => title,
            Ok(None) => DEFAULT_TITLE.to_string(),
            Err(e) => {
                tracing::warn!("Title generation failed, using default: {}", e);
                DEFAULT_TITLE.to_string()
            }
        }
    }

    async fn generate(&self, first_message: &str) -> Result<Option<String>> {
        let messages = vec![
            Message::system(GENERATE_CONVERSATION_TITLE),
            Message::human(first_message),
        ];

        let request =
            ChatRequest::new(self.model.as_str(), messages).with_options(self.params.options());

        let response = self.provider.chat(request).await?;
        Ok(response.text().map(str::to_string))
    }
}
