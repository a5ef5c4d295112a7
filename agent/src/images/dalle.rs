//! DALL-E 3 image generation

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use super::{ApiErrorBody, ImageGenerator, ImagesResponse};
use crate::config::AppConfig;
use crate::http::{endpoint, preview};

const MODEL: &str = "dall-e-3";

/// Message returned when the safety system rejects a prompt
pub const CONTENT_POLICY_MESSAGE: &str = "CONTENT_POLICY_VIOLATION - The prompt was rejected by the safety system. \
Retry with a simpler, more neutral, professional prompt (e.g. abstract illustration, \
generic scenery, or a toned-down description avoiding any sensitive wording).";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u32,
}

/// DALL-E 3 generator (one image per prompt)
pub struct Dalle3Generator {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    size: String,
    quality: String,
}

impl Dalle3Generator {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key,
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        }
    }

    /// Uses the `[llm]` credentials and the `[image]` size/quality
    pub fn from_config(config: &AppConfig) -> Self {
        let mut generator = Self::new(&config.llm.base_url, config.llm.api_key.clone());
        generator.size = config.image.size.clone();
        generator.quality = config.image.quality.clone();
        generator
    }
}

fn is_content_policy_violation(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("content_policy_violation") || lower.contains("safety system")
}

#[async_trait]
impl ImageGenerator for Dalle3Generator {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY not configured"))?;

        let url = endpoint(&self.base_url, "images/generations")?;
        let request = GenerateRequest {
            model: MODEL,
            prompt,
            size: &self.size,
            quality: &self.quality,
            n: 1,
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send HTTP request to DALL-E 3")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| {
                    format!(
                        "{} {}",
                        e.error.code.unwrap_or_default(),
                        e.error.message
                    )
                })
                .unwrap_or_else(|_| body.clone());

            tracing::error!("DALL-E 3 error {}: {}", status, preview(&detail, 300));
            if is_content_policy_violation(&detail) {
                anyhow::bail!("{}", CONTENT_POLICY_MESSAGE);
            }
            anyhow::bail!("DALL-E 3 API error {}: {}", status, preview(&detail, 500));
        }

        let body: ImagesResponse = response
            .json()
            .await
            .context("Failed to parse DALL-E 3 response")?;

        match body.data.into_iter().next().and_then(|d| d.url) {
            Some(image_url) => {
                tracing::info!("Successfully generated image with DALL-E 3: {}", image_url);
                Ok(vec![image_url])
            }
            None => anyhow::bail!("No image data returned from OpenAI API"),
        }
    }

    fn name(&self) -> &str {
        MODEL
    }
}
