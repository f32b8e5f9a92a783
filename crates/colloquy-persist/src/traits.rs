use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{Conversation, Turn, TurnRole};
use crate::error::Result;

/// Trait for conversation record persistence
///
/// Implementations provide database-specific CRUD operations. Cascade
/// deletion of turns is an orchestration concern, not a store concern.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a conversation with the given title
    async fn create(&self, title: &str) -> Result<Conversation>;

    /// Get a conversation by ID
    async fn get(&self, id: ObjectId) -> Result<Option<Conversation>>;

    /// List all conversations, most recently updated first
    async fn list_all(&self) -> Result<Vec<Conversation>>;

    /// Overwrite the rolling summary (bumps `updated_at`)
    async fn update_summary(&self, id: ObjectId, summary: &str) -> Result<()>;

    /// Bump `updated_at` (the turn set changed)
    async fn touch(&self, id: ObjectId) -> Result<()>;

    /// Delete the conversation record
    async fn delete(&self, id: ObjectId) -> Result<()>;

    /// Liveness round trip against the backing store, bounded to a single
    /// record regardless of collection size
    async fn ping(&self) -> Result<()>;
}

/// Trait for turn persistence
#[async_trait]
pub trait TurnStore: Send + Sync {
    /// Append a turn to a conversation
    async fn append(
        &self,
        conversation_id: ObjectId,
        role: TurnRole,
        content: &str,
    ) -> Result<Turn>;

    /// Latest `limit` turns, most-recent-first
    async fn recent_turns(&self, conversation_id: ObjectId, limit: i64) -> Result<Vec<Turn>>;

    /// All turns, chronological
    async fn all_turns(&self, conversation_id: ObjectId) -> Result<Vec<Turn>>;

    /// Delete every turn belonging to a conversation
    async fn delete_all(&self, conversation_id: ObjectId) -> Result<()>;
}
