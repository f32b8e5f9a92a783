use std::sync::Arc;

use colloquy_core::ChatService;
use colloquy_persist::ConversationStore;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for efficient sharing across async tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: Arc<ChatService>,
    pub conversations: Arc<dyn ConversationStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        chat: Arc<ChatService>,
        conversations: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            chat,
            conversations,
        }
    }
}
