//! Command handlers module
//!
//! CommandContext turns the resolved configuration into live clients
//! and the flow that uses them.

use std::sync::Arc;

use anyhow::Result;
use content_flow::{ContentGenerationFlow, FlowConfig, FlowDependencies};

use crate::config::AppConfig;
use crate::images::generator_from_config;
use crate::llm::OpenAiClient;
use crate::messaging::TwilioMessenger;
use crate::pipelines::{LlmImagePipeline, LlmTextPipeline};
use crate::prompts::TemplateRenderer;

pub mod run;
pub mod serve;

pub use run::run_flow;
pub use serve::run_serve;

/// Shared context for command handlers
pub struct CommandContext {
    pub config: AppConfig,
}

impl CommandContext {
    /// Create a new CommandContext from CLI args and file config
    pub fn new(
        model: Option<String>,
        base_url: Option<String>,
        mut config: AppConfig,
    ) -> Self {
        // CLI/env > config file > defaults
        if let Some(model) = model {
            config.llm.model = model;
        }
        if let Some(base_url) = base_url {
            config.llm.base_url = base_url;
        }

        Self { config }
    }

    /// Wire the configured clients into flow dependencies
    pub fn flow_dependencies(&self) -> FlowDependencies {
        let llm = Arc::new(OpenAiClient::from_config(&self.config.llm));
        let renderer = Arc::new(TemplateRenderer::new(self.config.prompts.dir.clone()));

        let text_pipeline = LlmTextPipeline::new(llm.clone(), renderer.clone());
        let image_pipeline = LlmImagePipeline::new(
            llm.clone(),
            renderer.clone(),
            generator_from_config(&self.config),
            self.config.image.mode,
        );

        FlowDependencies {
            llm,
            renderer,
            text_pipeline: Arc::new(text_pipeline),
            image_pipeline: Arc::new(image_pipeline),
            messenger: Some(Arc::new(TwilioMessenger::from_config(&self.config.twilio))),
        }
    }

    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            delivery_destination: self.config.twilio.whatsapp_to.clone(),
        }
    }

    /// Build a ready-to-run flow
    pub fn build_flow(&self) -> Result<ContentGenerationFlow> {
        if self.config.llm.api_key.is_none() {
            tracing::warn!("No API key configured; set OPENAI_API_KEY or [llm].api_key");
        }
        Ok(ContentGenerationFlow::new(
            self.flow_dependencies(),
            self.flow_config(),
        ))
    }
}
