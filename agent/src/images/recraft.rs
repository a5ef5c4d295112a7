//! Recraft v3 image generation

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use super::{ImageGenerator, ImagesResponse};
use crate::config::RecraftConfig;
use crate::http::{endpoint, preview};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    style: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'a str,
}

/// Recraft generator, talking to its OpenAI-compatible images API
pub struct RecraftGenerator {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    style: String,
    number_of_images: u32,
    size: String,
    response_format: String,
}

impl RecraftGenerator {
    pub fn from_config(config: &RecraftConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            style: config.style.clone(),
            number_of_images: config.number_of_images,
            size: config.size.clone(),
            response_format: config.response_format.clone(),
        }
    }
}

#[async_trait]
impl ImageGenerator for RecraftGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("RECRAFT_API_KEY not configured"))?;

        let url = endpoint(&self.base_url, "images/generations")?;
        let request = GenerateRequest {
            prompt,
            style: &self.style,
            n: self.number_of_images,
            size: &self.size,
            response_format: &self.response_format,
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send HTTP request to Recraft")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Recraft API error {}: {}", status, preview(&body, 500));
        }

        let body: ImagesResponse = response
            .json()
            .await
            .context("Failed to parse Recraft response")?;

        let mut urls = Vec::new();
        for (i, image) in body.data.into_iter().enumerate() {
            match (image.url, image.b64_json) {
                (Some(url), _) => urls.push(url),
                // Inline images would need object storage to become URLs
                (None, Some(_)) => {
                    tracing::warn!("Image {} returned inline data only; set response_format = \"url\"", i + 1)
                }
                (None, None) => tracing::warn!("No image data found for image {}", i + 1),
            }
        }

        tracing::info!("Recraft generated {} image URL(s)", urls.len());
        Ok(urls)
    }

    fn name(&self) -> &str {
        "recraft_v3"
    }
}
