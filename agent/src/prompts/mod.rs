//! Prompt templates and rendering
//!
//! Templates are markdown files with `{{ key }}` placeholders. A template
//! directory can override any built-in template by file name.

mod classifier;
mod image_prompt;
mod text_generation;

pub use image_prompt::IMAGE_PROMPT_SYSTEM_PROMPT;
pub use text_generation::TEXT_WRITER_SYSTEM_PROMPT;

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;

use content_flow::{PromptRenderer, CLASSIFIER_TEMPLATE};

pub const TEXT_GENERATION_TEMPLATE: &str = "text_generation.md";
pub const IMAGE_PROMPT_TEMPLATE: &str = "image_prompt_creator.md";

/// Look up a built-in template by file name
pub fn builtin_template(name: &str) -> Option<&'static str> {
    match name {
        CLASSIFIER_TEMPLATE => Some(classifier::CLASSIFIER_TEMPLATE_BODY),
        TEXT_GENERATION_TEMPLATE => Some(text_generation::TEXT_GENERATION_TEMPLATE_BODY),
        IMAGE_PROMPT_TEMPLATE => Some(image_prompt::IMAGE_PROMPT_TEMPLATE_BODY),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Substitute `{{ key }}` placeholders; unknown keys are left as written
pub fn render_template(template: &str, context: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                match context.get(key) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after_open[end + 2..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    result.push_str(rest);
    result
}

/// File-backed renderer with built-in fallbacks
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    dir: Option<PathBuf>,
}

impl TemplateRenderer {
    /// Create a renderer; `dir` overrides built-in templates when set
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Load template text, preferring the template directory
    pub fn load(&self, template_name: &str) -> Result<Cow<'static, str>, PromptError> {
        if let Some(dir) = &self.dir {
            let path = dir.join(template_name);
            if path.is_file() {
                tracing::debug!("Loading template from: {}", path.display());
                return std::fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|source| PromptError::Io { path, source });
            }
        }

        builtin_template(template_name)
            .map(Cow::Borrowed)
            .ok_or_else(|| PromptError::NotFound(template_name.to_string()))
    }
}

impl PromptRenderer for TemplateRenderer {
    fn render(&self, template_name: &str, context: &HashMap<String, String>) -> anyhow::Result<String> {
        let template = self.load(template_name)?;
        Ok(render_template(&template, context))
    }
}
