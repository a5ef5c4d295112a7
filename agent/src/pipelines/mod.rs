//! Sub-pipelines invoked by the flow for text and image generation

mod image;
mod text;

pub use image::LlmImagePipeline;
pub use text::LlmTextPipeline;

use std::collections::HashMap;

fn query_context(user_query: &str) -> HashMap<String, String> {
    let mut context = HashMap::new();
    context.insert("user_query".to_string(), user_query.to_string());
    context
}
