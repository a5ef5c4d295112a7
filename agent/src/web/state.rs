//! Shared application state

use std::sync::Arc;

use content_flow::ContentGenerationFlow;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Flow run for every request
    pub flow: Arc<ContentGenerationFlow>,
    /// Chat model name, reported by the health check
    pub model: String,
}

impl AppState {
    pub fn new(flow: ContentGenerationFlow, model: impl Into<String>) -> Self {
        Self {
            flow: Arc::new(flow),
            model: model.into(),
        }
    }
}
