//! Content generation flow execution
//!
//! Runs one request end to end:
//! - Classify the query with the LLM
//! - Route to text, image, or both
//! - Run the chosen sub-pipelines (both concurrently for the joint route)
//! - Merge results positionally
//! - Deliver over the messaging channel, if configured

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::collaborators::{
    ChatMessage, ChatModel, ImagePipeline, LlmReply, Messenger, PromptRenderer, TextPipeline,
};
use crate::delivery::deliver;
use crate::merge::merge_results;
use crate::payload::{decode_payload, strip_code_fence};
use crate::router::{self, Route};
use crate::state::{
    FlowState, Generated, ImageBatch, ImageGenerationOutput, PlannerOutput, TextBatch,
    TextGenerationOutput,
};

/// Template rendered as the classifier's user message
pub const CLASSIFIER_TEMPLATE: &str = "social_media_content_type.md";

/// System message sent alongside the classifier prompt
pub const CLASSIFIER_SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts social media platform, content type, and tone from user input.";

/// External collaborators used by the flow
#[derive(Clone)]
pub struct FlowDependencies {
    pub llm: Arc<dyn ChatModel>,
    pub renderer: Arc<dyn PromptRenderer>,
    pub text_pipeline: Arc<dyn TextPipeline>,
    pub image_pipeline: Arc<dyn ImagePipeline>,
    /// Messaging backend; `None` disables delivery
    pub messenger: Option<Arc<dyn Messenger>>,
}

/// Configuration for the content generation flow
#[derive(Debug, Clone, Default)]
pub struct FlowConfig {
    /// Address results are delivered to (e.g. a WhatsApp number)
    pub delivery_destination: Option<String>,
}

/// Input for a single run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowRequest {
    pub user_query: String,
    #[serde(default)]
    pub tenant: Option<String>,
}

impl FlowRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            tenant: None,
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }
}

impl From<&str> for FlowRequest {
    fn from(user_query: &str) -> Self {
        Self::new(user_query)
    }
}

impl From<String> for FlowRequest {
    fn from(user_query: String) -> Self {
        Self::new(user_query)
    }
}

/// Result of the classification step
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierOutcome {
    Classified(PlannerOutput),
    /// Classification failed; carries the diagnostic message
    Failed(String),
}

/// Single-request content generation flow
pub struct ContentGenerationFlow {
    deps: FlowDependencies,
    config: FlowConfig,
}

impl ContentGenerationFlow {
    /// Create a new flow
    pub fn new(deps: FlowDependencies, config: FlowConfig) -> Self {
        Self { deps, config }
    }

    /// Whether results of a run will be pushed to a messaging channel
    pub fn delivery_enabled(&self) -> bool {
        self.deps.messenger.is_some() && self.config.delivery_destination.is_some()
    }

    /// Run the flow for one request and return the final state.
    ///
    /// Never fails: every step converts its own errors into state.
    pub async fn kickoff(&self, request: impl Into<FlowRequest>) -> FlowState {
        let request = request.into();
        let started = Instant::now();
        let mut state = FlowState::new(request.user_query, request.tenant);

        tracing::info!("Content generation flow started: {}", state.user_query);

        match self.classify(&mut state).await {
            ClassifierOutcome::Classified(planner) => {
                tracing::info!("Classifier output: {:?}", planner);
            }
            ClassifierOutcome::Failed(message) => {
                tracing::warn!("Classification failed: {}", message);
            }
        }

        state.route = router::route(state.planner_output.as_ref());

        match state.route {
            Some(route) => {
                tracing::info!("Routing to {}", route);
                self.dispatch(route, &mut state).await;
                self.finish(&mut state).await;
            }
            None => {
                tracing::warn!("No branch selected; run produces no content");
            }
        }

        tracing::info!(
            "Content generation flow finished in {}ms ({} result(s))",
            started.elapsed().as_millis(),
            state.combined_results().len()
        );

        state
    }

    /// Classify the query and store the result in `planner_output`
    pub async fn classify(&self, state: &mut FlowState) -> ClassifierOutcome {
        match self.request_classification(&state.user_query).await {
            Ok(planner) => {
                state.planner_output = Some(planner.clone());
                ClassifierOutcome::Classified(planner)
            }
            Err(e) => {
                tracing::error!("Error occurred: {:#}", e);
                ClassifierOutcome::Failed(format!("{:#}", e))
            }
        }
    }

    async fn request_classification(&self, user_query: &str) -> Result<PlannerOutput> {
        let mut context = HashMap::new();
        context.insert("user_query".to_string(), user_query.to_string());

        let prompt = self
            .deps
            .renderer
            .render(CLASSIFIER_TEMPLATE, &context)
            .context("Failed to render classifier prompt")?;

        let messages = [
            ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];

        let reply = self
            .deps
            .llm
            .call(&messages)
            .await
            .context("Classifier call failed")?;

        let value = match reply {
            LlmReply::Structured(value) => value,
            LlmReply::Text(text) => serde_json::from_str(strip_code_fence(&text))
                .context("Classifier returned invalid JSON")?,
        };

        PlannerOutput::from_json(&value)
            .ok_or_else(|| anyhow::anyhow!("Classifier returned a non-object result: {}", value))
    }

    /// Run the sub-pipelines for the chosen branch
    async fn dispatch(&self, route: Route, state: &mut FlowState) {
        match route {
            Route::TextOnly => {
                state.text_generation_output = Some(
                    generate_text(Arc::clone(&self.deps.text_pipeline), state.user_query.clone())
                        .await,
                );
            }
            Route::ImageOnly => {
                state.image_generation_output = Some(
                    generate_images(
                        Arc::clone(&self.deps.image_pipeline),
                        state.user_query.clone(),
                        state.tenant.clone(),
                    )
                    .await,
                );
            }
            Route::TextWithImage => {
                let (text, images) = self
                    .dispatch_joint(state.user_query.clone(), state.tenant.clone())
                    .await;
                state.text_generation_output = Some(text);
                state.image_generation_output = Some(images);
            }
        }
    }

    /// Run text and image generation as independent tasks and wait for both
    async fn dispatch_joint(
        &self,
        user_query: String,
        tenant: Option<String>,
    ) -> (TextGenerationOutput, ImageGenerationOutput) {
        let text_task = tokio::spawn(generate_text(
            Arc::clone(&self.deps.text_pipeline),
            user_query.clone(),
        ));
        let image_task = tokio::spawn(generate_images(
            Arc::clone(&self.deps.image_pipeline),
            user_query,
            tenant,
        ));

        let (text_result, image_result) = tokio::join!(text_task, image_task);

        let text = text_result.unwrap_or_else(|e| {
            tracing::error!("Text generation task aborted: {}", e);
            Generated::invalid(format!("Text generation task aborted: {}", e))
        });
        let images = image_result.unwrap_or_else(|e| {
            tracing::error!("Image generation task aborted: {}", e);
            Generated::invalid(format!("Image generation task aborted: {}", e))
        });

        (text, images)
    }

    /// Completion point after the chosen branch: merge, then deliver
    async fn finish(&self, state: &mut FlowState) {
        state.final_output = merge_results(
            state.text_generation_output.as_ref(),
            state.image_generation_output.as_ref(),
        );

        state.whatsapp_send_output = deliver(
            self.deps.messenger.as_deref(),
            self.config.delivery_destination.as_deref(),
            &state.final_output.combined_results,
        )
        .await;
    }
}

async fn generate_text(pipeline: Arc<dyn TextPipeline>, user_query: String) -> TextGenerationOutput {
    let started = Instant::now();
    let output = match pipeline.generate(&user_query).await {
        Ok(raw) => decode_payload::<TextBatch>(&raw, "text generation"),
        Err(e) => {
            tracing::error!("Text generation failed: {:#}", e);
            Generated::invalid(format!("Text generation failed: {:#}", e))
        }
    };
    tracing::info!("Text generation completed in {}ms", started.elapsed().as_millis());
    output
}

async fn generate_images(
    pipeline: Arc<dyn ImagePipeline>,
    user_query: String,
    tenant: Option<String>,
) -> ImageGenerationOutput {
    let started = Instant::now();
    let output = match pipeline.generate(&user_query, tenant.as_deref()).await {
        Ok(raw) => decode_payload::<ImageBatch>(&raw, "image generation"),
        Err(e) => {
            tracing::error!("Image generation failed: {:#}", e);
            Generated::invalid(format!("Image generation failed: {:#}", e))
        }
    };
    tracing::info!("Image generation completed in {}ms", started.elapsed().as_millis());
    output
}
