//! Boundary traits for everything the flow calls out to
//!
//! The flow never constructs these itself; concrete clients are built by
//! the application and passed in through [`FlowDependencies`](crate::FlowDependencies).

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message in a chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Reply from a chat model: raw text, or an already-structured document
#[derive(Debug, Clone, PartialEq)]
pub enum LlmReply {
    Text(String),
    Structured(serde_json::Value),
}

/// Trait for LLM backends
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a message list and get the completion
    async fn call(&self, messages: &[ChatMessage]) -> Result<LlmReply>;

    /// Get the model name
    fn model(&self) -> &str;
}

/// Renders named prompt templates with a string context
pub trait PromptRenderer: Send + Sync {
    fn render(&self, template_name: &str, context: &HashMap<String, String>) -> Result<String>;
}

/// External text generation pipeline.
///
/// Returns the raw payload, expected to be `{"blogs": [{"content_of_blog": ...}]}`.
#[async_trait]
pub trait TextPipeline: Send + Sync {
    async fn generate(&self, user_query: &str) -> Result<String>;
}

/// External image generation pipeline.
///
/// Returns the raw payload, expected to be `{"images": [{"image_url": ...}]}`.
#[async_trait]
pub trait ImagePipeline: Send + Sync {
    async fn generate(&self, user_query: &str, tenant: Option<&str>) -> Result<String>;
}

/// One outbound message built from a merged record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: Option<String>,
    pub image: Option<String>,
}

/// Errors a messaging backend can report
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Missing destination, credentials, or sender; delivery is skipped
    #[error("Delivery not configured: {0}")]
    NotConfigured(String),

    /// The provider rejected the sender identity
    #[error("{0}")]
    InvalidSender(String),

    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Messaging channel used by the delivery step
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send every message to `destination`, returning provider message ids.
    ///
    /// A failure aborts the remaining sends.
    async fn send(
        &self,
        destination: &str,
        messages: &[OutboundMessage],
    ) -> std::result::Result<Vec<String>, DeliveryError>;
}
