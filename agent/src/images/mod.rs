//! Image generation tools
//!
//! Both backends speak the OpenAI images API shape (`POST /images/generations`
//! returning `{"data": [{"url": ...}]}`).

mod dalle;
mod recraft;

pub use dalle::Dalle3Generator;
pub use recraft::RecraftGenerator;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{AppConfig, ImageProvider};

/// Turns a single prompt into image URLs
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Response from an images endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ImagesResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
}

/// Error body returned by OpenAI-compatible APIs
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Build the configured image generator
pub fn generator_from_config(config: &AppConfig) -> Arc<dyn ImageGenerator> {
    match config.image.provider {
        ImageProvider::Dalle3 => Arc::new(Dalle3Generator::from_config(config)),
        ImageProvider::Recraft => Arc::new(RecraftGenerator::from_config(&config.image.recraft)),
    }
}
