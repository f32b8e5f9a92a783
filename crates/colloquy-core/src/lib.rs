//! Conversation-context engine.
//!
//! Keeps the prompt sent to the completion provider bounded regardless of
//! conversation length: a fixed window of recent turns plus a rolling
//! summary of everything older, refreshed on a periodic cadence.

pub mod config;
pub mod context;
pub mod error;
pub mod locks;
pub mod prompts;
pub mod service;
pub mod summarizer;
pub mod title;

pub use config::{ChatConfig, GenParams};
pub use context::ContextAssembler;
pub use error::{ChatError, Result};
pub use service::{ChatService, Reply};
pub use summarizer::Summarizer;
pub use title::TitleGenerator;
