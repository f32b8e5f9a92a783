use colloquy_llm::ChatOptions;

use crate::prompts::CONVERSATION_SUMMARY_PREFIX;

/// Tunables for the context engine.
///
/// Everything the engine would otherwise hardcode is injected here: the
/// window size `W`, the summarization cadence `S`, the summary prefix, the
/// model identifier, and the generation parameters of each provider call.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Model identifier sent on every provider call
    pub model: String,
    /// Number of recent turns included in the assembled context (`W`)
    pub window_size: usize,
    /// Summary refresh fires when the assembled length is a multiple of this (`S`)
    pub summary_interval: usize,
    /// Prefix of the synthetic system turn carrying the rolling summary
    pub summary_prefix: String,
    /// Generation parameters for the primary reply call
    pub reply: GenParams,
    /// Generation parameters for title generation
    pub title: GenParams,
    /// Generation parameters for summary generation
    pub summary: GenParams,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            window_size: 10,
            summary_interval: 20,
            summary_prefix: CONVERSATION_SUMMARY_PREFIX.to_string(),
            reply: GenParams::default(),
            title: GenParams {
                max_tokens: Some(20),
                temperature: Some(0.7),
            },
            summary: GenParams {
                max_tokens: Some(300),
                temperature: Some(0.5),
            },
        }
    }
}

/// Per-call generation parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct GenParams {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl GenParams {
    pub fn options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
