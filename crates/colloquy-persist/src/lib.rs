pub mod models;
pub mod traits;
pub mod mongo;
pub mod error;

pub use models::{Conversation, Turn, TurnRole};
pub use traits::{ConversationStore, TurnStore};
pub use mongo::{connect, MongoConversationStore, MongoTurnStore};
pub use error::{PersistError, Result};
