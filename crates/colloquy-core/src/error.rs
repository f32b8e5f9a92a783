use bson::oid::ObjectId;
use thiserror::Error;

use colloquy_persist::PersistError;

/// Failures that can surface from the core to its caller.
///
/// Title generation and summarization never appear here: they are
/// best-effort, consumed and logged inside the orchestrator.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Conversation not found: {0}")]
    NotFound(ObjectId),

    #[error("Completion provider error: {0}")]
    Provider(#[source] anyhow::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] PersistError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
