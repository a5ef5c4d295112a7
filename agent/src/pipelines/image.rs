use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use content_flow::payload::strip_code_fence;
use content_flow::{ChatModel, ImageBatch, ImageItem, ImagePipeline, PromptRenderer};
use serde::Deserialize;

use super::query_context;
use crate::config::ImageMode;
use crate::images::ImageGenerator;
use crate::llm::complete_text;
use crate::prompts::{IMAGE_PROMPT_SYSTEM_PROMPT, IMAGE_PROMPT_TEMPLATE};

#[derive(Debug, Deserialize)]
struct PromptList {
    prompts: Vec<String>,
}

/// Image pipeline: optional prompt-crafting step, then one generator call per prompt.
///
/// Generator failures do not fail the pipeline. They are reported in place
/// of the URL as `Error: ...` so downstream steps can see and filter them.
pub struct LlmImagePipeline {
    llm: Arc<dyn ChatModel>,
    renderer: Arc<dyn PromptRenderer>,
    generator: Arc<dyn ImageGenerator>,
    mode: ImageMode,
}

impl LlmImagePipeline {
    pub fn new(
        llm: Arc<dyn ChatModel>,
        renderer: Arc<dyn PromptRenderer>,
        generator: Arc<dyn ImageGenerator>,
        mode: ImageMode,
    ) -> Self {
        Self {
            llm,
            renderer,
            generator,
            mode,
        }
    }

    async fn design_prompts(&self, user_query: &str, tenant: Option<&str>) -> Result<Vec<String>> {
        let mut context = query_context(user_query);
        if let Some(tenant) = tenant {
            context.insert("tenant".to_string(), tenant.to_string());
        }
        let prompt = self.renderer.render(IMAGE_PROMPT_TEMPLATE, &context)?;
        let raw = complete_text(self.llm.as_ref(), IMAGE_PROMPT_SYSTEM_PROMPT, &prompt).await?;
        Ok(parse_prompts(&raw))
    }
}

/// Read `{"prompts": [...]}`, falling back to the whole reply as one prompt
fn parse_prompts(raw: &str) -> Vec<String> {
    let body = strip_code_fence(raw);
    match serde_json::from_str::<PromptList>(body) {
        Ok(list) => list
            .prompts
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        Err(e) => {
            tracing::warn!("Prompt designer did not return a prompt list ({}), using reply as prompt", e);
            let body = body.trim();
            if body.is_empty() {
                Vec::new()
            } else {
                vec![body.to_string()]
            }
        }
    }
}

#[async_trait]
impl ImagePipeline for LlmImagePipeline {
    async fn generate(&self, user_query: &str, tenant: Option<&str>) -> Result<String> {
        let prompts = match self.mode {
            ImageMode::TwoStage => self.design_prompts(user_query, tenant).await?,
            ImageMode::SingleStage => vec![user_query.to_string()],
        };
        tracing::info!(
            "Generating {} image(s) with {}",
            prompts.len(),
            self.generator.name()
        );

        let mut images = Vec::new();
        for prompt in &prompts {
            match self.generator.generate(prompt).await {
                Ok(urls) => images.extend(urls.into_iter().map(|image_url| {
                    Some(ImageItem {
                        image_url: Some(image_url),
                    })
                })),
                Err(e) => {
                    tracing::error!("Image generation failed: {}", e);
                    images.push(Some(ImageItem {
                        image_url: Some(format!("Error: {}", e)),
                    }));
                }
            }
        }

        Ok(serde_json::to_string(&ImageBatch { images })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::TemplateRenderer;
    use content_flow::{ChatMessage, LlmReply};
    use std::sync::Mutex;

    struct FixedLlm(String);

    #[async_trait]
    impl ChatModel for FixedLlm {
        async fn call(&self, _messages: &[ChatMessage]) -> Result<LlmReply> {
            Ok(LlmReply::Text(self.0.clone()))
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    /// Fails for prompts containing "bad", otherwise returns one URL per prompt
    #[derive(Default)]
    struct FakeGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<Vec<String>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if prompt.contains("bad") {
                anyhow::bail!("rejected");
            }
            Ok(vec![format!("https://img.example/{}.png", prompt.len())])
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn pipeline(reply: &str, generator: Arc<FakeGenerator>, mode: ImageMode) -> LlmImagePipeline {
        LlmImagePipeline::new(
            Arc::new(FixedLlm(reply.to_string())),
            Arc::new(TemplateRenderer::default()),
            generator,
            mode,
        )
    }

    fn decode(raw: &str) -> ImageBatch {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_parse_prompts() {
        assert_eq!(parse_prompts(r#"{"prompts": ["a", " ", "b"]}"#), vec!["a", "b"]);
        assert_eq!(
            parse_prompts("```json\n{\"prompts\": [\"fenced\"]}\n```"),
            vec!["fenced"]
        );
        assert_eq!(parse_prompts("  just a prompt "), vec!["just a prompt"]);
        assert!(parse_prompts("   ").is_empty());
    }

    #[tokio::test]
    async fn test_two_stage_generates_one_image_per_prompt() {
        let generator = Arc::new(FakeGenerator::default());
        let pipeline = pipeline(
            r#"{"prompts": ["blue abstract", "green"]}"#,
            generator.clone(),
            ImageMode::TwoStage,
        );

        let batch = decode(&pipeline.generate("AI in healthcare", None).await.unwrap());

        assert_eq!(batch.images.len(), 2);
        assert_eq!(
            *generator.prompts.lock().unwrap(),
            vec!["blue abstract".to_string(), "green".to_string()]
        );
    }

    #[tokio::test]
    async fn test_generator_failure_becomes_error_url() {
        let generator = Arc::new(FakeGenerator::default());
        let pipeline = pipeline(
            r#"{"prompts": ["bad idea", "fine"]}"#,
            generator,
            ImageMode::TwoStage,
        );

        let batch = decode(&pipeline.generate("q", None).await.unwrap());
        let urls: Vec<_> = batch
            .images
            .iter()
            .map(|i| i.as_ref().and_then(|i| i.image_url.clone()).unwrap())
            .collect();

        assert_eq!(urls[0], "Error: rejected");
        assert!(urls[1].starts_with("https://"));
    }

    #[tokio::test]
    async fn test_single_stage_uses_query_directly() {
        let generator = Arc::new(FakeGenerator::default());
        let pipeline = pipeline("unused", generator.clone(), ImageMode::SingleStage);

        pipeline.generate("sunset over hills", Some("acme")).await.unwrap();

        assert_eq!(*generator.prompts.lock().unwrap(), vec!["sunset over hills".to_string()]);
    }
}
