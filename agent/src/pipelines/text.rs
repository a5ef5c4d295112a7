use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use content_flow::{ChatModel, PromptRenderer, TextPipeline};

use super::query_context;
use crate::llm::complete_text;
use crate::prompts::{TEXT_GENERATION_TEMPLATE, TEXT_WRITER_SYSTEM_PROMPT};

/// Single-agent text writer.
///
/// Returns the model's raw reply; the flow decodes it.
pub struct LlmTextPipeline {
    llm: Arc<dyn ChatModel>,
    renderer: Arc<dyn PromptRenderer>,
}

impl LlmTextPipeline {
    pub fn new(llm: Arc<dyn ChatModel>, renderer: Arc<dyn PromptRenderer>) -> Self {
        Self { llm, renderer }
    }
}

#[async_trait]
impl TextPipeline for LlmTextPipeline {
    async fn generate(&self, user_query: &str) -> Result<String> {
        let prompt = self
            .renderer
            .render(TEXT_GENERATION_TEMPLATE, &query_context(user_query))?;

        tracing::info!("Generating text with {}", self.llm.model());
        let raw = complete_text(self.llm.as_ref(), TEXT_WRITER_SYSTEM_PROMPT, &prompt).await?;
        tracing::debug!("Text pipeline returned {} bytes", raw.len());
        Ok(raw)
    }
}
