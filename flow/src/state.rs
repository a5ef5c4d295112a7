//! Flow state and the typed records passed between steps
//!
//! One `FlowState` lives for exactly one request. Each field is written
//! by the step that owns it and read by the merge and delivery steps.

use serde::{Deserialize, Serialize};

use crate::router::Route;

/// Placeholder error stored when a sub-pipeline returns something that is
/// not the expected JSON document.
pub const INVALID_JSON_SENTINEL: &str = "Invalid JSON returned";

/// Output of the intent classifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerOutput {
    /// Branch name requested by the classifier (`text_only`, `image_only`, `text_with_image`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Desired tone of the content (e.g. "professional")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,

    /// Target social platform, if the classifier picked one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl PlannerOutput {
    /// Build from an arbitrary JSON object.
    ///
    /// Non-string values are dropped rather than rejected so the router can
    /// treat them as "no route".
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;

        let string_field = |key: &str| match object.get(key) {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => {
                tracing::warn!("Classifier field '{}' is not a string: {}", key, other);
                None
            }
        };

        Some(Self {
            content_type: string_field("content_type"),
            tone: string_field("tone"),
            platform: string_field("platform"),
        })
    }
}

/// A sub-pipeline result: either the decoded document or a sentinel error.
///
/// Serialized untagged, so the sentinel reads `{"error": "..."}` on the wire.
/// `Invalid` is listed first: the batch types default every field, so they
/// would also accept an `{"error": ...}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Generated<T> {
    Invalid { error: String },
    Parsed(T),
}

impl<T> Generated<T> {
    /// Sentinel for a payload that failed to decode
    pub fn invalid_json() -> Self {
        Self::Invalid {
            error: INVALID_JSON_SENTINEL.to_string(),
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self::Invalid {
            error: error.into(),
        }
    }

    pub fn parsed(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Invalid { .. } => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

/// A single generated text post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    #[serde(default)]
    pub content_of_blog: Option<String>,
}

/// Document returned by the text sub-pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBatch {
    #[serde(default)]
    pub blogs: Vec<Option<TextItem>>,
}

/// A single generated image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Document returned by the image sub-pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBatch {
    #[serde(default)]
    pub images: Vec<Option<ImageItem>>,
}

pub type TextGenerationOutput = Generated<TextBatch>;
pub type ImageGenerationOutput = Generated<ImageBatch>;

/// One `{text, image}` record of the combined result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedItem {
    pub text: Option<String>,
    pub image: Option<String>,
}

impl MergedItem {
    pub fn new(text: Option<String>, image: Option<String>) -> Self {
        Self { text, image }
    }
}

/// Final output assembled by the merge step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_generation_results: Option<TextGenerationOutput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_generation_results: Option<ImageGenerationOutput>,

    #[serde(default)]
    pub combined_results: Vec<MergedItem>,
}

/// Per-request state, created at kickoff and returned when the run ends
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowState {
    pub user_query: String,
    pub tenant: Option<String>,
    pub planner_output: Option<PlannerOutput>,
    pub route: Option<Route>,
    pub text_generation_output: Option<TextGenerationOutput>,
    pub image_generation_output: Option<ImageGenerationOutput>,
    pub final_output: FinalOutput,
    pub whatsapp_send_output: Vec<String>,
}

impl FlowState {
    pub fn new(user_query: impl Into<String>, tenant: Option<String>) -> Self {
        Self {
            user_query: user_query.into(),
            tenant,
            ..Default::default()
        }
    }

    /// Merged `{text, image}` records of this run
    pub fn combined_results(&self) -> &[MergedItem] {
        &self.final_output.combined_results
    }
}
