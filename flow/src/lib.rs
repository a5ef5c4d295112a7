//! Content generation flow
//!
//! This crate provides:
//! - Typed per-request state (`FlowState`) and stage records
//! - Intent routing to text, image, or joint generation
//! - Concurrent dispatch of the text and image sub-pipelines
//! - Positional merging of partial results
//! - Best-effort delivery over a messaging channel
//!
//! # Example
//!
//! ```rust,ignore
//! use content_flow::{ContentGenerationFlow, FlowConfig, FlowDependencies};
//!
//! let flow = ContentGenerationFlow::new(deps, FlowConfig::default());
//! let state = flow.kickoff("A LinkedIn post with an image about AI in healthcare").await;
//!
//! for item in state.combined_results() {
//!     println!("{:?} {:?}", item.text, item.image);
//! }
//! ```

pub mod collaborators;
pub mod delivery;
pub mod engine;
pub mod merge;
pub mod payload;
pub mod router;
pub mod state;

pub use collaborators::{
    ChatMessage, ChatModel, DeliveryError, ImagePipeline, LlmReply, Messenger, OutboundMessage,
    PromptRenderer, Role, TextPipeline,
};
pub use engine::{
    ClassifierOutcome, ContentGenerationFlow, FlowConfig, FlowDependencies, FlowRequest,
    CLASSIFIER_SYSTEM_PROMPT, CLASSIFIER_TEMPLATE,
};
pub use router::Route;
pub use state::{
    FinalOutput, FlowState, Generated, ImageBatch, ImageItem, MergedItem, PlannerOutput, TextBatch,
    TextItem, INVALID_JSON_SENTINEL,
};
