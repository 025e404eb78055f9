//! LLM provider implementations.
//!
//! Both providers speak a chat protocol: an optional system message followed
//! by one user message.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use crate::client::LlmRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// System message (when set) then the prompt as the user turn.
pub(crate) fn chat_messages(request: &LlmRequest) -> Vec<ChatMessage> {
    let system = request.system.iter().map(|content| ChatMessage {
        role: "system".to_string(),
        content: content.clone(),
    });
    let user = std::iter::once(ChatMessage {
        role: "user".to_string(),
        content: request.prompt.clone(),
    });
    system.chain(user).collect()
}

/// Trimmed reply text; `None` when blank.
pub(crate) fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
