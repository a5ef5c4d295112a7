//! OpenAI-compatible chat completions client

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{ChatMessage, ChatModel, LlmReply};
use crate::config::LlmConfig;
use crate::http::{endpoint, preview};

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

/// Response from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key,
            model: model.to_string(),
            temperature: 0.7,
        }
    }

    /// Create from the `[llm]` config section
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.base_url, &config.model, config.api_key.clone())
            .with_temperature(config.temperature)
    }

    /// Set sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn call(&self, messages: &[ChatMessage]) -> Result<LlmReply> {
        let url = endpoint(&self.base_url, "chat/completions")?;
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        tracing::debug!("LLM request: model={} messages={}", self.model, messages.len());

        let mut builder = self.http_client.post(url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .context("Failed to send HTTP request to LLM API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("LLM API error {}: {}", status, preview(&body, 500)));
        }

        let raw_body = response.text().await.context("Failed to get response text")?;
        let response_body: ChatResponse =
            serde_json::from_str(&raw_body).context("Failed to parse LLM response")?;

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("LLM response contained no message content"))?;

        tracing::info!(
            "LLM response from {} in {}ms ({} chars)",
            self.model,
            started.elapsed().as_millis(),
            content.len()
        );
        tracing::debug!("Content preview: {}", preview(&content, 200));

        Ok(LlmReply::Text(content))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
