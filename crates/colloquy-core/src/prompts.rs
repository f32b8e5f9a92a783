//! Fixed instruction strings used by the core components.

/// Instruction for naming a brand-new conversation from its first message.
pub const GENERATE_CONVERSATION_TITLE: &str =
    "Generate a short, concise title (max 5 words) for a conversation that \
     starts with the following message. Return only the title, nothing else.";

/// Prefix prepended to the rolling summary in the synthetic system turn.
pub const CONVERSATION_SUMMARY_PREFIX: &str =
    "Conversation summary (for your reference; DO NOT repeat this text to the user): ";

/// Instruction for rolling the assembled context up into a digest.
pub const GENERATE_CONVERSATION_SUMMARY: &str =
    "Summarize this conversation concisely, capturing the key topics discussed, \
     important decisions made, and any pending questions or action items. \
     Keep it under 200 words.";

/// Title used when generation fails or returns nothing.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Assistant turn recorded when the provider returns empty content.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "No response";
