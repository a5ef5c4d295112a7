//! LLM abstraction layer
//!
//! The `ChatModel` trait lives in `content_flow`; this module provides the
//! concrete OpenAI-compatible backend.

mod openai;

pub use content_flow::{ChatMessage, ChatModel, LlmReply, Role};
pub use openai::OpenAiClient;

use anyhow::Result;

/// Ask the model once and return the reply as text.
///
/// Structured replies are re-serialized so callers can treat every reply
/// as a raw payload.
pub async fn complete_text(llm: &dyn ChatModel, system: &str, user: &str) -> Result<String> {
    let messages = [ChatMessage::system(system), ChatMessage::user(user)];
    match llm.call(&messages).await? {
        LlmReply::Text(text) => Ok(text),
        LlmReply::Structured(value) => Ok(value.to_string()),
    }
}
